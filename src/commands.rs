//! Operational subcommands: configuration seeding and runtime diagnosis
//!
//! These replace the pile of one-off maintenance scripts the system used to
//! accumulate. Output goes to stdout: both commands are meant to be run by a
//! human or a provisioning step, not by the server.

use crate::ollama::{normalize_model_name, ModelService, OllamaClient};
use crate::settings::{Parameter, Settings};
use crate::store::{Result as StoreResult, Store};

/// Seed the configuration table with default rows for every parameter
///
/// Existing rows are left untouched, so this is safe to re-run.
pub async fn init_config(store: &Store) -> StoreResult<()> {
    store.ensure_schema().await?;

    for param in Parameter::ALL {
        let (value, description) = param.default_row();
        let created = store
            .create_parameter(param.as_str(), value, description)
            .await?;
        if created {
            println!("Created {} configuration", param.as_str());
        } else {
            println!("Configuration {} already exists", param.as_str());
        }
    }

    println!("\nConfiguration initialized successfully!");
    println!("Note: the default model is 'llama3.2'. If it isn't installed,");
    println!("run: ollama pull llama3.2, or change the model via the admin API.");
    Ok(())
}

/// Probe the Ollama runtime and the configured models
///
/// Returns whether everything checked out. With `fix` set, a configured model
/// that isn't installed is replaced in configuration by the first installed
/// one.
pub async fn doctor(settings: &Settings, fix: bool) -> bool {
    println!("Ollama diagnostics");
    println!("==================");

    let ollama = settings.ollama().await;
    let client = match OllamaClient::new(&ollama.host, ollama.timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            println!("Failed to build HTTP client: {}", e);
            return false;
        }
    };

    print!("1. Connection to {} ... ", ollama.host);
    match client.healthcheck().await {
        Ok(version) => println!("ok (version {})", version),
        Err(e) => {
            println!("FAILED: {}", e);
            println!("   Make sure Ollama is running: ollama serve");
            return false;
        }
    }

    println!("2. Installed models:");
    let installed = match client.list_models().await {
        Ok(models) => models,
        Err(e) => {
            println!("   FAILED to list models: {}", e);
            return false;
        }
    };
    if installed.is_empty() {
        println!("   none found. Run: ollama pull llama3.2");
        return false;
    }
    for model in &installed {
        let size_gb = model.size as f64 / f64::from(1 << 30);
        println!("   - {} ({:.1} GB)", model.name, size_gb);
    }
    let installed_names: Vec<&str> = installed.iter().map(|m| m.name.as_str()).collect();

    println!("3. Configured models:");
    let mut healthy = true;
    let configured = [
        (Parameter::OllamaModelGeneral, &ollama.general_model),
        (Parameter::OllamaModelBiomedical, &ollama.biomedical_model),
        (Parameter::OllamaModelAnalysis, &ollama.analysis_model),
    ];
    for (param, name) in configured {
        let normalized = normalize_model_name(name);
        if installed_names.contains(&normalized.as_str()) {
            println!("   {} = {} (installed)", param.as_str(), normalized);
        } else if fix {
            let replacement = &installed[0].name;
            match settings.set(param, replacement).await {
                Ok(()) => println!(
                    "   {} = {} (NOT installed, replaced with {})",
                    param.as_str(),
                    normalized,
                    replacement
                ),
                Err(e) => {
                    println!("   {} = {} (NOT installed, fix failed: {})", param.as_str(), normalized, e);
                    healthy = false;
                }
            }
        } else {
            println!(
                "   {} = {} (NOT installed; suggestion: ollama pull {})",
                param.as_str(),
                normalized,
                name
            );
            healthy = false;
        }
    }

    print!("4. Generation probe ... ");
    let probe_model = settings.get(Parameter::OllamaModelGeneral, "llama3.2").await;
    match client
        .generate("Say 'hello' in one short sentence.", &probe_model, None)
        .await
    {
        Ok(response) => {
            let preview: String = response.chars().take(60).collect();
            println!("ok: {}", preview);
        }
        Err(e) => {
            println!("FAILED: {}", e);
            healthy = false;
        }
    }

    if healthy {
        println!("\nAll checks passed.");
    } else {
        println!("\nSome checks failed, see above.");
    }
    healthy
}
