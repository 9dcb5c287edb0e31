//! Built-in examples.
//!
//! The closed set of wgpu examples a canvas offers to its host, in index order:
//!
//! | index | name          |
//! |-------|---------------|
//! | 0     | `clear-color` |
//! | 1     | `msaa-line`   |
//! | 2     | `spinner`     |

mod common;

pub mod clear;
pub mod msaa_line;
pub mod spinner;

pub use clear::ClearColor;
pub use msaa_line::MsaaLine;
pub use spinner::Spinner;

use crate::device::WgpuBackend;
use crate::example::ExampleRegistry;

/// Registry with every built-in example, in index order.
pub fn default_examples() -> ExampleRegistry<WgpuBackend> {
    ExampleRegistry::new()
        .register(ClearColor::new())
        .register(MsaaLine::new())
        .register(Spinner::new())
}
