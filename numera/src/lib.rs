//! # Numera
//!
//! Dense n-dimensional array computing for embedding in host languages.
//!
//! One `use numera::prelude::*;` gives you real and complex arrays with
//! broadcasting arithmetic, reductions, sorting, manipulation, linear
//! algebra, signal kernels, and the 1-based host bridge.
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | The array engine |
//! | `serde` | `Serialize`/`Deserialize` for dtypes, values and nested lists |

pub use numera_core as core;

/// Glob-import convenience: `use numera::prelude::*;`
pub mod prelude {
    pub use numera_core::prelude::*;
}
