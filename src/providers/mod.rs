pub mod nbp;

pub use nbp::NbpProvider;
