use serenity::all::{Command as GatewayCommand, CommandOptionType, CreateCommand, CreateCommandOption, Http};
use tracing::{info, warn};

use ember_core::localized::{LocalizedChoice, LocalizedNode, LocalizedOption, LocalizedText};
use ember_core::{ChoiceValue, Error, OptionKind};

use crate::registry::{CompiledCommand, RegistryState};

/// Registration payloads for every enabled command with a slash surface.
pub fn create_commands(state: &RegistryState) -> Vec<CreateCommand> {
    state
        .commands()
        .iter()
        .filter(|command| command.schema().enabled && command.schema().kind.has_slash_surface())
        .map(|command| create_command(command))
        .collect()
}

/// Replace the global application commands with the current registry.
pub async fn publish(http: &Http, state: &RegistryState) -> Result<usize, Error> {
    let payloads = create_commands(state);
    let count = payloads.len();
    GatewayCommand::set_global_commands(http, payloads).await?;
    info!(count, "application commands published");
    Ok(count)
}

pub fn create_command(command: &CompiledCommand) -> CreateCommand {
    let localized = command.localized();
    let rules = &command.schema().access;

    let mut payload = CreateCommand::new(&localized.text.name)
        .description(&localized.text.description)
        .dm_permission(rules.dm_access);
    for (locale, name) in &localized.text.name_localizations {
        payload = payload.name_localized(locale, name);
    }
    for (locale, description) in &localized.text.description_localizations {
        payload = payload.description_localized(locale, description);
    }
    if !rules.user_permissions.is_empty() {
        payload = payload.default_member_permissions(rules.user_permissions);
    }

    for node in &localized.nodes {
        payload = payload.add_option(create_option(command.key(), node));
    }
    payload
}

fn create_option(command: &str, node: &LocalizedNode) -> CreateCommandOption {
    match node {
        LocalizedNode::Value(option) => value_option(command, option),
        LocalizedNode::Subcommand { text, options, .. } => options.iter().fold(
            base_option(CommandOptionType::SubCommand, text),
            |payload, option| payload.add_sub_option(create_option(command, option)),
        ),
        LocalizedNode::Group { text, children, .. } => children.iter().fold(
            base_option(CommandOptionType::SubCommandGroup, text),
            |payload, child| payload.add_sub_option(create_option(command, child)),
        ),
    }
}

fn base_option(kind: CommandOptionType, text: &LocalizedText) -> CreateCommandOption {
    let mut payload = CreateCommandOption::new(kind, &text.name, &text.description);
    for (locale, name) in &text.name_localizations {
        payload = payload.name_localized(locale, name);
    }
    for (locale, description) in &text.description_localizations {
        payload = payload.description_localized(locale, description);
    }
    payload
}

fn value_option(command: &str, option: &LocalizedOption) -> CreateCommandOption {
    let schema = &option.schema;
    let mut payload = base_option(option_type(schema.kind), &option.text).required(schema.required);

    if let Some(length) = schema.min_length {
        payload = payload.min_length(length);
    }
    if let Some(length) = schema.max_length {
        payload = payload.max_length(length);
    }

    match schema.kind {
        OptionKind::Integer => {
            if let Some(value) = schema.min_value {
                match integer_bound(value) {
                    Some(bound) => match u64::try_from(bound) {
                        Ok(bound) => payload = payload.min_int_value(bound),
                        Err(_) => payload = payload.min_number_value(bound as f64),
                    },
                    None => warn!(command, option = %schema.key, value, "integer min_value out of range; skipped"),
                }
            }
            if let Some(value) = schema.max_value {
                match integer_bound(value) {
                    Some(bound) => match u64::try_from(bound) {
                        Ok(bound) => payload = payload.max_int_value(bound),
                        Err(_) => payload = payload.max_number_value(bound as f64),
                    },
                    None => warn!(command, option = %schema.key, value, "integer max_value out of range; skipped"),
                }
            }
        }
        _ => {
            if let Some(value) = schema.min_value {
                payload = payload.min_number_value(value);
            }
            if let Some(value) = schema.max_value {
                payload = payload.max_number_value(value);
            }
        }
    }

    option
        .choices
        .iter()
        .fold(payload, |payload, choice| add_choice(command, &schema.key, payload, choice))
}

/// Whole numbers representable as `i64`; `as` would saturate instead.
fn integer_bound(value: f64) -> Option<i64> {
    let whole = value.is_finite() && value.fract() == 0.0;
    (whole && value >= i64::MIN as f64 && value < i64::MAX as f64).then_some(value as i64)
}

fn add_choice(
    command: &str,
    option: &str,
    payload: CreateCommandOption,
    choice: &LocalizedChoice,
) -> CreateCommandOption {
    let locales = choice
        .name_localizations
        .iter()
        .map(|(locale, name)| (locale.clone(), name.clone()));

    match &choice.value {
        ChoiceValue::String(value) => payload.add_string_choice_localized(&choice.name, value, locales),
        ChoiceValue::Number(value) => payload.add_number_choice_localized(&choice.name, *value, locales),
        ChoiceValue::Integer(value) => match (*value).try_into() {
            Ok(value) => payload.add_int_choice_localized(&choice.name, value, locales),
            Err(_) => {
                warn!(command, option, value, "integer choice out of range; skipped");
                payload
            }
        },
    }
}

fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Number => CommandOptionType::Number,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::User | OptionKind::Member => CommandOptionType::User,
        OptionKind::Role => CommandOptionType::Role,
        OptionKind::Channel => CommandOptionType::Channel,
        OptionKind::Mentionable => CommandOptionType::Mentionable,
    }
}
