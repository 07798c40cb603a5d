use serenity::all::CreateEmbed;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_55_30;

pub const INFO_COLOR: u32 = 0x34_98_DB;
pub const SUCCESS_COLOR: u32 = 0x57_F2_87;
pub const ERROR_COLOR: u32 = 0xED_42_45;

fn status_embed(description: impl Into<String>, color: u32) -> CreateEmbed {
    CreateEmbed::new().description(description).color(color)
}

pub fn info_embed(description: impl Into<String>) -> CreateEmbed {
    status_embed(description, INFO_COLOR)
}

pub fn success_embed(description: impl Into<String>) -> CreateEmbed {
    status_embed(description, SUCCESS_COLOR)
}

pub fn error_embed(description: impl Into<String>) -> CreateEmbed {
    status_embed(description, ERROR_COLOR)
}

/// Embed shown when a handler fails unexpectedly.
pub fn command_error_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("Command Error")
        .description("Something went wrong while running this command.")
        .color(DEFAULT_EMBED_COLOR)
}
