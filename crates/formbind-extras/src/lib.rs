//! Optional feature-gated extensions for formbind.
//!
//! Each module sits behind a Cargo feature and builds on the core, widget,
//! and runtime crates. All features are on by default.
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `delivery` | [`delivery`] | Delivery-schedule form variants and the delivery-method provider |
//! | `repetition` | [`repetition`] | Repetition units and their cron preview |
//! | `result-forms` | [`result_forms`] | Result-form template registry |
//! | `theme` | [`theme`] | Font-size and zoom-scale conversion |
//! | `stereo-pair` | [`stereo_pair`] | Stereo image pair lookup and previews |
//! | `form-sharing` | [`form_sharing`] | Shared search-form list with loading state |

#![forbid(unsafe_code)]

#[cfg(feature = "delivery")]
pub mod delivery;

#[cfg(feature = "form-sharing")]
pub mod form_sharing;

#[cfg(feature = "repetition")]
pub mod repetition;

#[cfg(feature = "result-forms")]
pub mod result_forms;

#[cfg(feature = "stereo-pair")]
pub mod stereo_pair;

#[cfg(feature = "theme")]
pub mod theme;
