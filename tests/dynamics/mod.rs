mod force_models;
mod harmonics;
mod third_body;
