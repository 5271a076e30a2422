use clap::Parser;
use std::net::SocketAddr;
use time::{Time, UtcOffset};

use pacer::config::{AppConfig, FcmConfig, FirestoreConfig, NotifySchedule};

const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "https://dev-runal.netlify.app",
    "https://runal.netlify.app",
];

pub(crate) enum RunOutcome {
    Serve(SocketAddr, AppConfig),
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    match resolve_config(&cli) {
        Ok(config) => RunOutcome::Serve(cli.addr, config),
        Err(err) => {
            eprintln!("error: {err}");
            RunOutcome::Exit(2)
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pacer",
    version,
    about = "Push notification server for marathon events"
)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
    #[arg(
        long = "allow-origin",
        env = "PACER_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    allow_origin: Vec<String>,
    #[arg(long, env = "PACER_FCM_SERVER_KEY")]
    fcm_server_key: String,
    #[arg(
        long,
        env = "PACER_FCM_ENDPOINT",
        default_value = "https://fcm.googleapis.com/fcm/send"
    )]
    fcm_endpoint: String,
    #[arg(long, env = "PACER_FIRESTORE_PROJECT")]
    firestore_project: String,
    #[arg(long, env = "PACER_FIRESTORE_TOKEN")]
    firestore_token: Option<String>,
    #[arg(
        long,
        env = "PACER_FIRESTORE_ENDPOINT",
        default_value = "https://firestore.googleapis.com/v1"
    )]
    firestore_endpoint: String,
    #[arg(long, env = "PACER_NOTIFY_HOUR", default_value_t = 8)]
    notify_hour: u8,
    #[arg(long, env = "PACER_UTC_OFFSET", default_value = "+09:00")]
    utc_offset: String,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, String> {
    let at = Time::from_hms(cli.notify_hour, 0, 0)
        .map_err(|_| format!("invalid notify hour '{}'; expected 0-23", cli.notify_hour))?;
    let utc_offset = parse_utc_offset(&cli.utc_offset)?;

    if cli.fcm_server_key.trim().is_empty() {
        return Err("FCM server key cannot be empty".to_string());
    }
    if cli.firestore_project.trim().is_empty() {
        return Err("Firestore project id cannot be empty".to_string());
    }

    let allowed_origins = if cli.allow_origin.is_empty() {
        DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect()
    } else {
        cli.allow_origin.clone()
    };

    Ok(AppConfig {
        allowed_origins,
        schedule: NotifySchedule { at, utc_offset },
        fcm: FcmConfig {
            endpoint: cli.fcm_endpoint.clone(),
            server_key: cli.fcm_server_key.clone(),
        },
        firestore: FirestoreConfig {
            endpoint: cli.firestore_endpoint.trim_end_matches('/').to_string(),
            project_id: cli.firestore_project.clone(),
            auth_token: cli.firestore_token.clone(),
        },
    })
}

fn parse_utc_offset(raw: &str) -> Result<UtcOffset, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("utc offset cannot be empty".to_string());
    }

    let invalid = || format!("invalid utc offset '{value}'; expected [+|-]HH[:MM]");

    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => (-1i8, rest),
        None => (1i8, value.strip_prefix('+').unwrap_or(value)),
    };
    let (hours_raw, minutes_raw) = match rest.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None => (rest, "0"),
    };

    let hours: i8 = hours_raw.parse().map_err(|_| invalid())?;
    let minutes: i8 = minutes_raw.parse().map_err(|_| invalid())?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid());
    }

    UtcOffset::from_hms(sign * hours, sign * minutes, 0).map_err(|_| invalid())
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use time::macros::offset;

    fn base_cli() -> Cli {
        Cli {
            addr: "127.0.0.1:3000".parse().expect("addr"),
            allow_origin: Vec::new(),
            fcm_server_key: "server-key".to_string(),
            fcm_endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
            firestore_project: "runal".to_string(),
            firestore_token: None,
            firestore_endpoint: "https://firestore.googleapis.com/v1".to_string(),
            notify_hour: 8,
            utc_offset: "+09:00".to_string(),
        }
    }

    #[test]
    fn parse_utc_offset__should_parse_signed_offsets() {
        assert_eq!(parse_utc_offset("+09:00").expect("offset"), offset!(+9));
        assert_eq!(parse_utc_offset("-05:30").expect("offset"), offset!(-5:30));
    }

    #[test]
    fn parse_utc_offset__should_default_minutes_and_sign() {
        assert_eq!(parse_utc_offset("9").expect("offset"), offset!(+9));
    }

    #[test]
    fn parse_utc_offset__should_reject_invalid_values() {
        assert!(parse_utc_offset("").is_err());
        assert!(parse_utc_offset("25").is_err());
        assert!(parse_utc_offset("+09:75").is_err());
        assert!(parse_utc_offset("KST").is_err());
    }

    #[test]
    fn resolve_config__should_apply_default_origins_when_none_given() {
        // Given
        let cli = base_cli();

        // When
        let config = resolve_config(&cli).expect("resolve config");

        // Then
        assert_eq!(config.allowed_origins.len(), 3);
        assert!(
            config
                .allowed_origins
                .contains(&"https://runal.netlify.app".to_string())
        );
        assert_eq!(config.schedule.utc_offset, offset!(+9));
    }

    #[test]
    fn resolve_config__should_keep_explicit_origins() {
        // Given
        let mut cli = base_cli();
        cli.allow_origin = vec!["https://staging.example".to_string()];

        // When
        let config = resolve_config(&cli).expect("resolve config");

        // Then
        assert_eq!(
            config.allowed_origins,
            vec!["https://staging.example".to_string()]
        );
    }

    #[test]
    fn resolve_config__should_reject_out_of_range_hour() {
        // Given
        let mut cli = base_cli();
        cli.notify_hour = 24;

        // When / Then
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn resolve_config__should_reject_blank_server_key() {
        // Given
        let mut cli = base_cli();
        cli.fcm_server_key = "  ".to_string();

        // When / Then
        assert!(resolve_config(&cli).is_err());
    }
}
