pub mod job_builder;
