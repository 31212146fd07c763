use std::fmt::Display;

/// Fills printf-style placeholders (`%s`, `%d`) in `template` with `args`, in order.
///
/// ```text
/// ("bag %s", [3])        -> "bag 3"
/// ("Join %d~%d", [3, 4]) -> "Join 3~4"
/// ```
///
/// `%%` produces a literal `%`. Surplus placeholders are kept verbatim, surplus
/// arguments are ignored.
pub fn fill_template(template: &str, args: &[&dyn Display]) -> String {
    let mut result = String::with_capacity(template.len() + 8);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                result.push('%');
            }
            Some(&spec @ ('s' | 'd')) => {
                chars.next();
                match args.next() {
                    Some(arg) => result.push_str(&arg.to_string()),
                    None => {
                        result.push('%');
                        result.push(spec);
                    }
                }
            }
            _ => result.push('%'),
        }
    }
    result
}

/// Position of node `index` out of `count` nodes evenly spaced on a circle.
///
/// The first node sits at the top, the rest follow clockwise. The radius grows with
/// `count` so that neighbouring nodes stay `spacing` apart. Coordinates are rounded
/// to three decimals.
pub fn circle_position(index: usize, count: usize, spacing: f64) -> (f64, f64) {
    if count <= 1 {
        return (0.0, 0.0);
    }
    let radius = (count as f64 * spacing / std::f64::consts::TAU).max(spacing);
    let angle = std::f64::consts::FRAC_PI_2 - std::f64::consts::TAU * index as f64 / count as f64;
    let round = |v: f64| (v * 1000.0).round() / 1000.0 + 0.0;
    (round(radius * angle.cos()), round(radius * angle.sin()))
}
