use super::Context;
use crate::render;
use neuralchat_core::ModelId;

pub fn list(ctx: &Context) {
    for model in ModelId::all() {
        println!(
            "{}",
            render::model_line(model, model == ctx.config.default_model)
        );
    }
}
