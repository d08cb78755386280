//! Ingestion & enrichment pipelines.
//!
//! Two data flows feed the stores:
//!
//! 1. Recipe scrape: category listings → detail pages → normalised recipe
//!    documents in the document store. Sandwich recipes arrive separately,
//!    folded from a flat (sandwich, ingredient) relation.
//! 2. Enrichment: stored ingredient names → translation → nutrition API →
//!    food/nutrient rows in the relational store.
//!
//! Both run to completion, serially, with per-item error isolation; a
//! re-run is safe because every store write is an idempotent upsert.

pub mod models;
pub mod pipeline;
pub mod sandwich_csv;
pub mod sources;
pub mod translate;
