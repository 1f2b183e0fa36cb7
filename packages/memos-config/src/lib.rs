mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, MemosApi, Service, Tools};

use std::{env, fs, net::SocketAddr, path::Path};

pub const API_KEY_ENV_VARS: [&str; 2] = ["MEMOS_ACCESS_TOKEN", "MEMOS_API_KEY"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	apply_api_key_fallback(&mut cfg, |key| env::var(key).ok());

	validate(&cfg)?;

	Ok(cfg)
}

/// Fills a missing `memos.api_key` from the first non-blank value returned by `lookup` for
/// [`API_KEY_ENV_VARS`].
pub fn apply_api_key_fallback<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if cfg.memos.api_key.is_some() {
		return;
	}

	cfg.memos.api_key = API_KEY_ENV_VARS
		.iter()
		.filter_map(|key| lookup(key))
		.map(|value| value.trim().to_string())
		.find(|value| !value.is_empty());
}

pub fn validate(cfg: &Config) -> Result<()> {
	let transport = cfg.service.transport.as_str();

	if !matches!(transport, "stdio" | "http") {
		return Err(Error::Validation {
			message: "service.transport must be one of stdio or http.".to_string(),
		});
	}
	if transport == "http" {
		let bind_addr: SocketAddr = cfg.service.mcp_bind.parse().map_err(|_| Error::Validation {
			message: "service.mcp_bind must be a valid socket address.".to_string(),
		})?;

		if !bind_addr.ip().is_loopback() {
			return Err(Error::Validation {
				message: "service.mcp_bind must be a loopback address.".to_string(),
			});
		}
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	validate_memos(&cfg.memos)?;
	validate_tools(&cfg.tools)?;

	Ok(())
}

fn validate_memos(memos: &MemosApi) -> Result<()> {
	if memos.url.is_empty() {
		return Err(Error::Validation { message: "memos.url must be non-empty.".to_string() });
	}
	if !(memos.url.starts_with("http://") || memos.url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "memos.url must start with http:// or https://.".to_string(),
		});
	}
	if memos.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(true) {
		return Err(Error::Validation {
			message: format!(
				"memos.api_key must be set in the config or through {}.",
				API_KEY_ENV_VARS.join(" or ")
			),
		});
	}
	if memos.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "memos.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if memos.page_size == 0 {
		return Err(Error::Validation {
			message: "memos.page_size must be greater than zero.".to_string(),
		});
	}
	if memos.max_pages == 0 {
		return Err(Error::Validation {
			message: "memos.max_pages must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &memos.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("memos.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn validate_tools(tools: &Tools) -> Result<()> {
	for (label, value) in [
		("tools.legacy_search_limit", tools.legacy_search_limit),
		("tools.listing_limit_max", tools.listing_limit_max),
		("tools.latest_content_max_length", tools.latest_content_max_length),
		("tools.by_tag_content_max_length", tools.by_tag_content_max_length),
	] {
		if value <= 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.transport = cfg.service.transport.trim().to_ascii_lowercase();
	cfg.memos.url = cfg.memos.url.trim().trim_end_matches('/').to_string();

	if cfg.memos.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.memos.api_key = None;
	}

	let tag = cfg.tools.default_tag.trim();

	cfg.tools.default_tag = if tag.is_empty() {
		types::default_tag()
	} else if tag.starts_with('#') {
		tag.to_string()
	} else {
		format!("#{tag}")
	};
}
