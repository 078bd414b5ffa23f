//! Tick placement and labels.

/// Ticks at "nice" 1-2-5 multiples inside `[lo, hi]`, aiming for about `target` of them.
///
/// Returns the tick values and the step between them.
#[must_use]
pub fn linear_ticks(lo: f32, hi: f32, target: usize) -> (Vec<f32>, f32) {
    let span = hi - lo;
    if !(span.is_finite() && span > 0.0) {
        return (vec![lo], 1.0);
    }

    let raw = span / target.max(1) as f32;
    let magnitude = 10f32.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = magnitude
        * if normalized < 1.5 {
            1.0
        } else if normalized < 3.0 {
            2.0
        } else if normalized < 7.0 {
            5.0
        } else {
            10.0
        };

    let first = (lo / step - 1e-4).ceil() as i64;
    let last = (hi / step + 1e-4).floor() as i64;
    let ticks = (first..=last).map(|k| if k == 0 { 0.0 } else { k as f32 * step }).collect();
    (ticks, step)
}

/// Decade ticks inside `[lo, hi]` for a log axis; thinned to at most `max` ticks.
///
/// Falls back to linear ticks when the range spans no full decade.
#[must_use]
pub fn log_ticks(lo: f32, hi: f32, max: usize) -> Vec<f32> {
    if !(lo > 0.0 && hi > lo) {
        return Vec::new();
    }
    let first = (lo.log10() - 1e-4).ceil() as i32;
    let last = (hi.log10() + 1e-4).floor() as i32;
    if last < first {
        return linear_ticks(lo, hi, 4).0.into_iter().filter(|v| *v > 0.0).collect();
    }

    let count = (last - first + 1) as usize;
    let stride = count.div_ceil(max.max(1)).max(1);
    (first..=last).step_by(stride).map(|k| 10f32.powi(k)).collect()
}

/// Label for a linear tick, with as many decimals as the step needs.
#[must_use]
pub fn format_linear(value: f32, step: f32) -> String {
    let decimals = if step > 0.0 { (-(step.log10() + 1e-4).floor()).max(0.0) as usize } else { 0 };
    let text = format!("{value:.decimals$}");
    if value < 0.0 && text.trim_start_matches('-').chars().any(|c| c != '0' && c != '.') {
        text.replacen('-', "\u{2212}", 1)
    } else {
        text.trim_start_matches('-').to_string()
    }
}

/// Label for a log tick: `10ⁿ` for exact decades, plain decimal otherwise.
#[must_use]
pub fn format_log(value: f32) -> String {
    let exponent = value.log10();
    if (exponent - exponent.round()).abs() < 1e-4 {
        format!("10{}", superscript(exponent.round() as i32))
    } else {
        format_linear(value, value / 10.0)
    }
}

fn superscript(n: i32) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '\u{207b}',
            '0' => '\u{2070}',
            '1' => '\u{b9}',
            '2' => '\u{b2}',
            '3' => '\u{b3}',
            d => char::from_u32(0x2070 + d.to_digit(10).unwrap_or(0)).unwrap_or(d),
        })
        .collect()
}
