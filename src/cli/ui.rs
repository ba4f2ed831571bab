use anyhow::Result;
use inquire::ui::RenderConfig;
use inquire::Confirm;

/// Minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()?;
    Ok(result)
}

/// Confirm a delete unless `force` is set
pub fn confirm_delete(what: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    confirm(&format!("Delete {}?", what))
}
