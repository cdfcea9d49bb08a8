use rand::Rng;

/// Lowest value produced by [`RandomCaptor`].
pub const CAPTOR_MIN: f64 = -30.0;
/// Upper bound (exclusive) of [`RandomCaptor`].
pub const CAPTOR_MAX: f64 = 70.0;

/// Something that can be asked for the current temperature.
pub trait TemperatureSource: Send + Sync {
    fn read(&self) -> f64;
}

/// Simulated probe, uniformly distributed in `[CAPTOR_MIN, CAPTOR_MAX)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomCaptor;

impl TemperatureSource for RandomCaptor {
    fn read(&self) -> f64 {
        rand::thread_rng().gen_range(CAPTOR_MIN..CAPTOR_MAX)
    }
}

/// Always reports the same temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCaptor(pub f64);

impl TemperatureSource for FixedCaptor {
    fn read(&self) -> f64 {
        self.0
    }
}

impl<F> TemperatureSource for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn read(&self) -> f64 {
        self()
    }
}
