//! Per-step rendering for the quote dialog

mod category;
mod characteristics;
mod contact;
