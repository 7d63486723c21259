use crate::Expr;
use crate::compiler::{floored_rem, real_pow};
use crate::functions::registry::Registry;
use rustc_hash::FxHashMap;

/// Expression kind for fast rule filtering
/// Rules declare which expression kinds they can apply to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum ExprKind {
    Number,
    Variable,
    Constant,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Function,
}

impl ExprKind {
    pub(crate) const ALL: [ExprKind; 11] = [
        ExprKind::Number,
        ExprKind::Variable,
        ExprKind::Constant,
        ExprKind::Neg,
        ExprKind::Add,
        ExprKind::Sub,
        ExprKind::Mul,
        ExprKind::Div,
        ExprKind::Rem,
        ExprKind::Pow,
        ExprKind::Function,
    ];

    /// Get the kind of an expression (cheap O(1) operation)
    #[inline]
    pub(crate) fn of(expr: &Expr) -> Self {
        match expr {
            Expr::Number(_) => ExprKind::Number,
            Expr::Variable => ExprKind::Variable,
            Expr::Constant(_) => ExprKind::Constant,
            Expr::Neg(_) => ExprKind::Neg,
            Expr::Add(_, _) => ExprKind::Add,
            Expr::Sub(_, _) => ExprKind::Sub,
            Expr::Mul(_, _) => ExprKind::Mul,
            Expr::Div(_, _) => ExprKind::Div,
            Expr::Rem(_, _) => ExprKind::Rem,
            Expr::Pow(_, _) => ExprKind::Pow,
            Expr::FunctionCall { .. } => ExprKind::Function,
        }
    }
}

/// Core trait for all simplification rules
pub(crate) trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Higher runs first
    fn priority(&self) -> i32;

    /// Whether the rewrite can remove points where the original was undefined
    /// (`x/x → 1` is defined at 0, `x/x` is not)
    fn alters_domain(&self) -> bool {
        false
    }

    /// Which expression kinds this rule can apply to
    fn applies_to(&self) -> &'static [ExprKind];

    fn apply(&self, expr: &Expr, context: &RuleContext) -> Option<Expr>;
}

/// Context passed to rules during application
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RuleContext {
    pub domain_safe: bool,
}

/// Rules indexed by the expression kind they apply to, each list in
/// descending priority
pub(crate) struct RuleRegistry {
    rules_by_kind: FxHashMap<ExprKind, Vec<&'static dyn Rule>>,
}

impl RuleRegistry {
    pub(crate) fn new() -> Self {
        let mut rules = all_rules();
        rules.sort_by_key(|r| std::cmp::Reverse(r.priority()));

        let mut rules_by_kind: FxHashMap<ExprKind, Vec<&'static dyn Rule>> =
            FxHashMap::default();
        for kind in ExprKind::ALL {
            rules_by_kind.insert(kind, Vec::new());
        }
        for rule in rules {
            for &kind in rule.applies_to() {
                rules_by_kind.entry(kind).or_default().push(rule);
            }
        }
        Self { rules_by_kind }
    }

    /// Get only rules that apply to a specific expression kind
    #[inline]
    pub(crate) fn get_rules_for_kind(&self, kind: ExprKind) -> &[&'static dyn Rule] {
        self.rules_by_kind
            .get(&kind)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

fn all_rules() -> Vec<&'static dyn Rule> {
    vec![
        &ConstantFoldRule,
        &AddZeroRule,
        &SubZeroRule,
        &SubSelfRule,
        &MulZeroRule,
        &MulOneRule,
        &MulCoefficientRule,
        &DivOneRule,
        &ZeroDivRule,
        &DivSelfRule,
        &PowOneRule,
        &PowZeroRule,
        &NegationRule,
    ]
}

fn is_number(e: &Expr, value: f64) -> bool {
    matches!(e, Expr::Number(n) if *n == value)
}

// ===== Numeric =====

/// Evaluate operators and function calls whose operands are all numbers
pub(crate) struct ConstantFoldRule;

impl Rule for ConstantFoldRule {
    fn name(&self) -> &'static str {
        "constant_fold"
    }

    fn priority(&self) -> i32 {
        200
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[
            ExprKind::Neg,
            ExprKind::Add,
            ExprKind::Sub,
            ExprKind::Mul,
            ExprKind::Div,
            ExprKind::Rem,
            ExprKind::Pow,
            ExprKind::Function,
        ]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        let folded = match expr {
            Expr::Neg(u) => -u.as_number()?,
            Expr::Add(u, v) => u.as_number()? + v.as_number()?,
            Expr::Sub(u, v) => u.as_number()? - v.as_number()?,
            Expr::Mul(u, v) => u.as_number()? * v.as_number()?,
            Expr::Div(u, v) => {
                let den = v.as_number()?;
                if den == 0.0 {
                    return None;
                }
                u.as_number()? / den
            }
            Expr::Rem(u, v) => floored_rem(u.as_number()?, v.as_number()?).ok()?,
            Expr::Pow(u, v) => real_pow(u.as_number()?, v.as_number()?).ok()?,
            Expr::FunctionCall { name, args } => {
                let values = args
                    .iter()
                    .map(Expr::as_number)
                    .collect::<Option<Vec<f64>>>()?;
                (Registry::get(name)?.eval)(&values)?
            }
            _ => return None,
        };
        folded.is_finite().then_some(Expr::number(folded))
    }
}

/// x + 0 = x, 0 + x = x
pub(crate) struct AddZeroRule;

impl Rule for AddZeroRule {
    fn name(&self) -> &'static str {
        "add_zero"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Add]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        if let Expr::Add(u, v) = expr {
            if is_number(u, 0.0) {
                return Some((**v).clone());
            }
            if is_number(v, 0.0) {
                return Some((**u).clone());
            }
        }
        None
    }
}

/// x - 0 = x, 0 - x = -x
pub(crate) struct SubZeroRule;

impl Rule for SubZeroRule {
    fn name(&self) -> &'static str {
        "sub_zero"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Sub]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        if let Expr::Sub(u, v) = expr {
            if is_number(v, 0.0) {
                return Some((**u).clone());
            }
            if is_number(u, 0.0) {
                return Some(Expr::neg((**v).clone()));
            }
        }
        None
    }
}

/// x - x = 0
pub(crate) struct SubSelfRule;

impl Rule for SubSelfRule {
    fn name(&self) -> &'static str {
        "sub_self"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn alters_domain(&self) -> bool {
        true
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Sub]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Sub(u, v) if u == v => Some(Expr::number(0.0)),
            _ => None,
        }
    }
}

/// 0 * x = 0, x * 0 = 0
pub(crate) struct MulZeroRule;

impl Rule for MulZeroRule {
    fn name(&self) -> &'static str {
        "mul_zero"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn alters_domain(&self) -> bool {
        true
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Mul]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Mul(u, v) if is_number(u, 0.0) || is_number(v, 0.0) => Some(Expr::number(0.0)),
            _ => None,
        }
    }
}

/// 1 * x = x, x * 1 = x
pub(crate) struct MulOneRule;

impl Rule for MulOneRule {
    fn name(&self) -> &'static str {
        "mul_one"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Mul]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        if let Expr::Mul(u, v) = expr {
            if is_number(u, 1.0) {
                return Some((**v).clone());
            }
            if is_number(v, 1.0) {
                return Some((**u).clone());
            }
        }
        None
    }
}

/// a * (b * x) = (a*b) * x, and numbers move to the left: x * a = a * x
pub(crate) struct MulCoefficientRule;

impl Rule for MulCoefficientRule {
    fn name(&self) -> &'static str {
        "mul_coefficient"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Mul]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        let Expr::Mul(u, v) = expr else {
            return None;
        };
        match (&**u, &**v) {
            (Expr::Number(_), Expr::Number(_)) => None,
            (Expr::Number(a), Expr::Mul(inner_u, inner_v)) => {
                let b = inner_u.as_number()?;
                Some(Expr::mul_expr(Expr::number(a * b), (**inner_v).clone()))
            }
            (_, Expr::Number(b)) => Some(Expr::mul_expr(Expr::number(*b), (**u).clone())),
            _ => None,
        }
    }
}

/// x / 1 = x
pub(crate) struct DivOneRule;

impl Rule for DivOneRule {
    fn name(&self) -> &'static str {
        "div_one"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Div]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Div(u, v) if is_number(v, 1.0) => Some((**u).clone()),
            _ => None,
        }
    }
}

/// 0 / x = 0
pub(crate) struct ZeroDivRule;

impl Rule for ZeroDivRule {
    fn name(&self) -> &'static str {
        "zero_div"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn alters_domain(&self) -> bool {
        true
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Div]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Div(u, v) if is_number(u, 0.0) && !is_number(v, 0.0) => Some(Expr::number(0.0)),
            _ => None,
        }
    }
}

/// x / x = 1
pub(crate) struct DivSelfRule;

impl Rule for DivSelfRule {
    fn name(&self) -> &'static str {
        "div_self"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn alters_domain(&self) -> bool {
        true
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Div]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Div(u, v) if u == v && !is_number(v, 0.0) => Some(Expr::number(1.0)),
            _ => None,
        }
    }
}

/// x^1 = x
pub(crate) struct PowOneRule;

impl Rule for PowOneRule {
    fn name(&self) -> &'static str {
        "pow_one"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Pow]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Pow(u, v) if is_number(v, 1.0) => Some((**u).clone()),
            _ => None,
        }
    }
}

/// x^0 = 1
pub(crate) struct PowZeroRule;

impl Rule for PowZeroRule {
    fn name(&self) -> &'static str {
        "pow_zero"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn alters_domain(&self) -> bool {
        true
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Pow]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        match expr {
            Expr::Pow(_, v) if is_number(v, 0.0) => Some(Expr::number(1.0)),
            _ => None,
        }
    }
}

/// --x = x, -(a * x) = (-a) * x
pub(crate) struct NegationRule;

impl Rule for NegationRule {
    fn name(&self) -> &'static str {
        "negation"
    }

    fn priority(&self) -> i32 {
        95
    }

    fn applies_to(&self) -> &'static [ExprKind] {
        &[ExprKind::Neg]
    }

    fn apply(&self, expr: &Expr, _context: &RuleContext) -> Option<Expr> {
        let Expr::Neg(inner) = expr else {
            return None;
        };
        match &**inner {
            Expr::Neg(x) => Some((**x).clone()),
            Expr::Mul(a, x) => {
                let a = a.as_number()?;
                Some(Expr::mul_expr(Expr::number(-a), (**x).clone()))
            }
            _ => None,
        }
    }
}
