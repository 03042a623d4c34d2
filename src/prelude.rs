//! rfsweep prelude.
//!
//! This module contains the most used types and functions that you can
//! import easily as a group.
//!
//! ```
//! use rfsweep::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::config::{AcquisitionConfig, SweepSettings};

#[doc(no_inline)]
pub use crate::dataset::SParameterDataset;

#[doc(no_inline)]
pub use crate::error::SweepError;

#[doc(no_inline)]
pub use crate::export::{export_csv, write_csv};

#[doc(no_inline)]
pub use crate::file::{read_touchstone, write_touchstone, NetworkLoader, TouchstoneLoader};

#[doc(no_inline)]
pub use crate::filter::{indices_in_range, propose_value_bounds, visible, RangeBounds, VisibleTrace};

#[doc(no_inline)]
pub use crate::frequency::{Frequency, FrequencySweepPlan};

#[doc(no_inline)]
pub use crate::probe::{nearest_sample, Probe};

#[doc(no_inline)]
pub use crate::scale::Scale;

#[doc(no_inline)]
pub use crate::session::{acquire_once, InstrumentSession};

#[doc(no_inline)]
pub use crate::trace::{ComplexFormat, TraceSelector, ViewMode};

#[doc(no_inline)]
pub use crate::transport::{TcpTransport, Transport};

#[doc(no_inline)]
pub use crate::viewer::Viewer;
