//! Default value functions for serde deserialization.

pub fn subsample() -> usize {
    10
}

pub fn source_cost() -> f64 {
    12.0
}

pub fn receiver_cost() -> f64 {
    4.0
}

pub fn source_count() -> usize {
    2
}

pub fn receiver_count() -> usize {
    2
}

pub fn rho_0() -> f64 {
    4.0
}

pub fn pulse_length() -> f64 {
    0.4
}

pub fn required_probability() -> f64 {
    0.95
}

pub fn p_max() -> f64 {
    0.95
}

pub fn p_min() -> f64 {
    0.1
}

pub fn b1() -> f64 {
    0.2
}

pub fn b2() -> f64 {
    0.1
}

pub fn overflow_guard() -> f64 {
    300.0
}

pub fn heading_step() -> u16 {
    30
}

pub fn user_cut_tolerance() -> f64 {
    1.0
}

pub fn heuristic_rounds() -> u32 {
    0
}

pub fn heuristic_time_limit() -> f64 {
    600.0
}

pub fn max_sampling_attempts() -> u32 {
    1000
}

pub fn time_limit() -> f64 {
    3600.0
}
