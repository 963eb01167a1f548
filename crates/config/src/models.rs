//! Known chat models and their display labels.

pub const GPT_4_TURBO: &str = "gpt-4-1106-preview";
pub const GPT_4: &str = "gpt-4";
pub const GPT_3_5_TURBO: &str = "gpt-3.5-turbo-16k";

/// Models offered by default, in display order.
pub const MODEL_CATALOGUE: &[(&str, &str)] = &[
    (GPT_4_TURBO, "GPT-4 Turbo Preview (128k tokens)"),
    (GPT_4, "GPT-4 (8k tokens)"),
    (GPT_3_5_TURBO, "GPT-3.5 Turbo (16k tokens)"),
];

pub fn model_label(model: &str) -> Option<&'static str> {
    MODEL_CATALOGUE
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, label)| *label)
}

pub fn is_known_model(model: &str) -> bool {
    model_label(model).is_some()
}
