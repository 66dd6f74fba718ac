/// Statistics layer: descriptive aggregation over a loaded [`Table`].
///
/// `metrics` holds the scalar/grouped means, correlation, and distribution
/// helpers; `buckets` derives categorical columns from continuous ones
/// (fixed-edge and quantile binning). Every function here is a pure,
/// read-only pass over its inputs — derived quantities such as quantile
/// boundaries or the overtime threshold are recomputed from whatever view
/// the caller passes in, never cached.
///
/// [`Table`]: crate::data::model::Table
pub mod buckets;
pub mod metrics;
