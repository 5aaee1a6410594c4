pub mod path_tracer;
