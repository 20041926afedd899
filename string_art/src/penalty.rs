use crate::Float;

/// Bleaching applied to the working array along a selected chord.
pub trait Penalty<S>: Send + Sync {
    fn compute(&self, intensity: S) -> S;
}

#[derive(Clone, Copy, Debug)]
pub struct FlatPenalty<S>(pub S);

impl<S: Float> Penalty<S> for FlatPenalty<S> {
    fn compute(&self, intensity: S) -> S {
        (intensity + self.0).clamp_intensity()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PercentagePenalty<S>(pub S);

impl<S: Float> Penalty<S> for PercentagePenalty<S> {
    fn compute(&self, intensity: S) -> S {
        (intensity + (S::TWO_FIVE_FIVE - intensity) * self.0).clamp_intensity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_penalty_saturates_at_white() {
        let penalty = FlatPenalty(40.0f32);
        assert_relative_eq!(penalty.compute(100.0), 140.0);
        assert_relative_eq!(penalty.compute(230.0), 255.0);
    }

    #[test]
    fn percentage_penalty_closes_the_gap_to_white() {
        let penalty = PercentagePenalty(0.5f64);
        assert_relative_eq!(penalty.compute(55.0), 155.0);
        assert_relative_eq!(penalty.compute(255.0), 255.0);
        assert_relative_eq!(PercentagePenalty(1.0f64).compute(0.0), 255.0);
    }
}
