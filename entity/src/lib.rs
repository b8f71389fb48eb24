//! Record shapes shared by the HR store, pipeline and front ends.

pub mod employee;
