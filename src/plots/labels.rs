//! Axis and legend labels, written with Unicode sub- and superscripts.

/// Unicode subscript digits for `n`.
#[must_use]
pub fn subscript(n: usize) -> String {
    n.to_string()
        .chars()
        .map(|d| char::from_u32(0x2080 + d.to_digit(10).unwrap_or(0)).unwrap_or(d))
        .collect()
}

/// `X` with a subscripted node index, e.g. `X₂`.
#[must_use]
pub fn node(n: usize) -> String {
    format!("X{}", subscript(n))
}

/// Generic node symbol `Xᵢ`.
pub const ANY_NODE: &str = "Xᵢ";

/// Time axis of simulated trajectories.
pub const TRAJECTORY_TIME: &str = "T";

/// Time axis of density evolution.
pub const EVOLUTION_TIME: &str = "t";

/// Stationary density axis.
pub const STATIONARY_PDF: &str = "PDF pˢᵗ(Xᵢ)";

/// Time-dependent density colorbar.
pub const EVOLVING_PDF: &str = "PDF p(Xᵢ, t)";

/// Covariance entry axis.
pub const COVARIANCE_INDEX: &str = "(i, j)";

/// Covariance value axis.
pub const COVARIANCE: &str = "Covariance Σᵢⱼ";

/// Legend label of comparator curves from the model without triadic interactions.
pub const NO_TRIADIC: &str = "no TI";

/// Covariance matrix entry `Σᵢⱼ` (1-based indices).
#[must_use]
pub fn covariance_entry(i: usize, j: usize) -> String {
    format!("Σ{}{}", subscript(i), subscript(j))
}

/// `E[Xₐ | X_c]` with subscripted node indices.
#[must_use]
pub fn conditional_expectation(target: usize, condition: usize) -> String {
    format!("E[{} | {}]", node(target), node(condition))
}

/// `ρ(Xᵢ, Xⱼ | Xₖ)`.
#[must_use]
pub fn conditional_correlation(i: usize, j: usize, k: usize) -> String {
    format!("ρ({}, {} | {})", node(i), node(j), node(k))
}

/// `I(Xᵢ; Xⱼ | Xₖ)`.
#[must_use]
pub fn mutual_information(i: usize, j: usize, k: usize) -> String {
    format!("I({}; {} | {})", node(i), node(j), node(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscripts() {
        assert_eq!(subscript(0), "₀");
        assert_eq!(subscript(12), "₁₂");
        assert_eq!(node(3), "X₃");
    }

    #[test]
    fn test_statistic_labels() {
        assert_eq!(covariance_entry(1, 2), "Σ₁₂");
        assert_eq!(conditional_expectation(1, 3), "E[X₁ | X₃]");
        assert_eq!(conditional_correlation(1, 2, 3), "ρ(X₁, X₂ | X₃)");
        assert_eq!(mutual_information(2, 3, 1), "I(X₂; X₃ | X₁)");
    }
}
