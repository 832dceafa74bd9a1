//! Startup wiring shared by the commands.
//!
//! Loads the configuration, resolves API keys, and builds the fetch
//! context, registry, cache and repository once per process.

use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::{debug, info};
use wallfeed_core::ProviderId;
use wallfeed_fetch::{FetchContext, HttpClient, Transport};
use wallfeed_providers::{PROVIDER_DOMAINS, ProviderRegistry, RegistryOptions};
use wallfeed_store::{
    Config, JsonFileCache, RepositoryOptions, WallpaperCache, WallpaperRepository,
};

use crate::Cli;

/// Startup failed because no enabled provider has the key it needs.
#[derive(Debug)]
pub struct NoUsableProviders;

impl std::fmt::Display for NoUsableProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no usable providers; enable one and set its API key (see `wallfeed providers`)")
    }
}

impl std::error::Error for NoUsableProviders {}

/// Everything a command needs.
pub struct App {
    pub ctx: FetchContext,
    pub repo: WallpaperRepository,
}

impl App {
    /// Builds the application from the command line.
    pub async fn build(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;
        let options = registry_options(&config, cli)?;
        let usable = options.usable_providers();
        if usable.is_empty() {
            return Err(NoUsableProviders.into());
        }

        let settings = config.fetch_settings(&options)?;
        let transport = HttpClient::with_timeout(settings.timeout)?
            .with_allowed_domains(PROVIDER_DOMAINS.iter().map(ToString::to_string).collect());
        let ctx = FetchContext::builder()
            .transport(Arc::new(transport) as Arc<dyn Transport>)
            .settings(settings)
            .build()?;
        // Runs for the life of the process.
        drop(ctx.balancer.spawn_reset_task());

        let registry = Arc::new(ProviderRegistry::new(&ctx, &options));
        let cache_path = config.cache_path();
        debug!(path = %cache_path.display(), "Opening cache");
        let cache: Arc<dyn WallpaperCache> = Arc::new(
            JsonFileCache::open(cache_path)
                .await
                .with_retention(config.cache_retention()),
        );
        let repo = WallpaperRepository::new(registry, cache).with_options(RepositoryOptions {
            cache_ttl: config.cache_ttl(),
            force_refresh: cli.refresh,
        });

        info!(providers = ?usable, "Wallfeed ready");
        Ok(Self { ctx, repo })
    }
}

/// Loads the configuration named on the command line, or the default one.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    Config::load_from(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Registry options from the config, narrowed by `--provider`.
pub fn registry_options(config: &Config, cli: &Cli) -> Result<RegistryOptions> {
    let mut options = config.registry_options(config.api_keys());
    if let Some(selected) = parse_provider_selection(cli.provider.as_deref())? {
        options.enabled.retain(|p| selected.contains(p));
        if options.enabled.is_empty() {
            bail!("selected providers are disabled in the configuration");
        }
    }
    Ok(options)
}

/// Parses `--provider`: `None` or `"all"` selects every provider.
pub fn parse_provider_selection(arg: Option<&str>) -> Result<Option<Vec<ProviderId>>> {
    let Some(arg) = arg.map(str::trim) else {
        return Ok(None);
    };
    if arg.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let mut selected = Vec::new();
    for name in arg.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let provider: ProviderId = name
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown provider: {name}"))?;
        if !selected.contains(&provider) {
            selected.push(provider);
        }
    }
    if selected.is_empty() {
        bail!("no provider named in --provider");
    }
    Ok(Some(selected))
}
