pub mod brownian_pca;
pub mod gamma_pca;
pub mod model;
pub mod ou_euler;
pub mod ou_process;
pub mod process;

pub use brownian_pca::BrownianMotionPca;
pub use gamma_pca::GammaProcessPca;
pub use model::SDEModel;
pub use ou_euler::OuProcessEuler;
pub use ou_process::OuProcess;
pub use process::{PathGenerator, ProcessCore, SamplingStrategy};
