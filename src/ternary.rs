/// A ternary expression macro.  Rust's `if` is already an expression,
/// but `cargo fmt` spreads it over four lines, and the table of border
/// rules in the energy and seam code is much easier to read when each
/// rule stays on one.
#[macro_export]
macro_rules! pick {
    ($condition: expr, $when: expr, $otherwise: expr) => {
        if $condition {
            $when
        } else {
            $otherwise
        }
    };
}
