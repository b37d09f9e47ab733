//! PS3: descriptive plots of the Spotify top-2000 song attributes.

pub mod plots;
pub mod stats;
pub mod table;

pub use plots::{distribution_plot, scatter_3d_plot, scatter_fit_plot, scatter_plot};
pub use stats::{auto_bins, gaussian_kde, histogram, linear_fit, unique_sorted, Histogram, LinearFit};
pub use table::{Column, SongTable, Summary};
