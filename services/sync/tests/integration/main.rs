mod helpers;
mod pipeline_test;
mod quarantine_test;
