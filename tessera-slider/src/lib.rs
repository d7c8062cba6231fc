//! Value and interaction engine for single and multi-thumb sliders.
//!
//! The crate is renderer agnostic. A host feeds it layout width, pointer and
//! key events, and reads back values, a draw snapshot and accessibility
//! nodes.
//!
//! # Layout
//!
//! - [`value_set`]: thumb values, range and step with lazy validation.
//! - [`quantize`] and [`mapping`]: step snapping and value/pixel conversion.
//! - [`thumb_picker`] and [`separation`]: which thumb a touch moves and how
//!   close it may get to its neighbours.
//! - [`slider`]: the [`Slider`] engine with touch, keyboard, focus,
//!   accessibility and state persistence.
//! - [`shape`] and [`shadow`]: thumb outline and shadow gradients.
//!
//! # Example
//!
//! ```
//! use tessera_slider::{KeyEvent, Slider, SliderArgs, SliderKey};
//!
//! let mut slider = Slider::new(
//!     SliderArgs::default()
//!         .value_from(0.0)
//!         .value_to(10.0)
//!         .step_size(1.0)
//!         .values([5.0]),
//! )
//! .unwrap();
//! slider.set_width(200.0);
//!
//! slider.on_key_down(KeyEvent::new(SliderKey::Right)).unwrap();
//! assert_eq!(slider.values(), &[6.0]);
//! ```

pub mod error;
pub mod mapping;
pub mod quantize;
pub mod separation;
pub mod shadow;
pub mod shape;
pub mod slider;
pub mod thumb_picker;
pub mod value_set;

pub use error::{ConfigurationError, PrecisionField, PrecisionWarning, Result};
pub use mapping::{CoordinateMapper, LayoutDirection, TrackGeometry};
pub use separation::{SeparationPolicy, SeparationUnit};
pub use slider::{
    FocusDirection, InteractionPhase, KeyEvent, ListenerId, SavedSliderState, Slider, SliderArgs,
    SliderKey, SliderSnapshot, ThumbMetrics, TouchAction, TouchEvent, TouchTracking, ValueChange,
};
pub use value_set::{THRESHOLD, ValueSet};
