pub mod relay;

pub use relay::{RelayService, router, serve};
