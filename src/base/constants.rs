/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/relperm_upscale/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/relperm_upscale/test";

/// Defines the space dimension of the upscaling block (and the number of flow directions)
pub const NDIM: usize = 3;

/// Defines one day in seconds
pub const UNIT_DAY: f64 = 86_400.0;

/// Defines the number of intervals used to sample the fractional flow derivative
pub const N_FRAC_FLOW_SAMPLES: usize = 200;
