pub mod extra_payments;
pub mod schedule;
