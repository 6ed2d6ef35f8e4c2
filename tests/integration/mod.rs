//! Integration tests driving the license-year binary against throwaway repositories

mod helpers;
mod test_dialects;
mod test_run;
mod test_transform;
