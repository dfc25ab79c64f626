use rand::Rng;

/// Shared random source threaded through a search run.
///
/// The engine's tournament selection and the injected chromosome operators
/// all draw from the generator exposed here, giving one generator per run.
pub trait EntropySource {
    type Rng: Rng;

    fn rng(&mut self) -> &mut Self::Rng;
}

impl EntropySource for rand::rngs::StdRng {
    type Rng = rand::rngs::StdRng;

    fn rng(&mut self) -> &mut Self::Rng {
        self
    }
}
