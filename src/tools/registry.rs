//! The static catalog of security tools.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::DEFAULT_WORDLIST;
use crate::tools::template::{CommandTemplate, TemplateError};

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    ///
    /// Advertised to clients only; arguments are not validated against it.
    pub input_schema: Value,
}

/// A registered tool: its descriptor plus the command line it runs.
#[derive(Debug, Clone)]
pub struct Tool {
    descriptor: ToolDescriptor,
    template: CommandTemplate,
}

impl Tool {
    /// Creates a tool whose schema declares each of `params` as a required string.
    ///
    /// `params` pairs an argument name with its description and must name exactly
    /// the argument placeholders of `template`.
    #[must_use]
    pub fn new(
        name: &str,
        description: &str,
        template: impl Into<CommandTemplate>,
        params: &[(&str, &str)],
    ) -> Self {
        let properties: Map<String, Value> = params
            .iter()
            .map(|(param, about)| {
                (
                    (*param).to_string(),
                    json!({ "type": "string", "description": about }),
                )
            })
            .collect();
        let required: Vec<&str> = params.iter().map(|(param, _)| *param).collect();

        Self {
            descriptor: ToolDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }),
            },
            template: template.into(),
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the public descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Returns the command template.
    #[must_use]
    pub const fn template(&self) -> &CommandTemplate {
        &self.template
    }

    /// Builds the shell command line for a call with `arguments`.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument the template needs is missing.
    pub fn command_line(&self, arguments: &Map<String, Value>) -> Result<String, TemplateError> {
        self.template.render(arguments)
    }
}

/// The immutable set of tools served by this process, in listing order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Tool>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool, replacing any earlier tool with the same name in place.
    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Builds the standard Kali catalog with the default wordlist.
    #[must_use]
    pub fn kali() -> Self {
        Self::kali_with_wordlist(Path::new(DEFAULT_WORDLIST))
    }

    /// Builds the standard Kali catalog.
    ///
    /// `wordlist` is baked into the `gobuster_scan` command line.
    #[must_use]
    pub fn kali_with_wordlist(wordlist: &Path) -> Self {
        let gobuster = CommandTemplate::new("gobuster dir -u {url} -w {wordlist}")
            .with_fixed("wordlist", wordlist.display().to_string());

        Self::new()
            .with_tool(Tool::new(
                "nmap_scan",
                "Run Nmap scan",
                "nmap -sCV {target}",
                &[("target", "Host, IP address or network range to scan")],
            ))
            .with_tool(Tool::new(
                "gobuster_scan",
                "Run Gobuster directory scan",
                gobuster,
                &[("url", "Base URL to brute-force")],
            ))
            .with_tool(Tool::new(
                "dirb_scan",
                "Run Dirb scan",
                "dirb {url}",
                &[("url", "Base URL to scan")],
            ))
            .with_tool(Tool::new(
                "nikto_scan",
                "Run Nikto scan",
                "nikto -h {target}",
                &[("target", "Web server host or URL")],
            ))
            .with_tool(Tool::new(
                "sqlmap_scan",
                "Run SQLMap scan",
                "sqlmap -u {url} --batch",
                &[("url", "Target URL including query parameters")],
            ))
            .with_tool(Tool::new(
                "wpscan_analyze",
                "Run WPScan",
                "wpscan --url {url}",
                &[("url", "WordPress site URL")],
            ))
            .with_tool(Tool::new(
                "enum4linux_scan",
                "Run Enum4linux",
                "enum4linux -a {target}",
                &[("target", "SMB host to enumerate")],
            ))
            .with_tool(Tool::new(
                "hydra_attack",
                "Run Hydra brute force",
                "hydra {target} {service}",
                &[
                    ("target", "Host to attack"),
                    ("service", "Service module, e.g. ssh or ftp"),
                ],
            ))
            .with_tool(Tool::new(
                "john_crack",
                "Run John the Ripper",
                "john {hash_file}",
                &[("hash_file", "Path to the file of hashes")],
            ))
            .with_tool(Tool::new(
                "metasploit_run",
                "Run Metasploit module",
                "msfconsole -q -x 'use {module}; run; exit'",
                &[("module", "Module path, e.g. auxiliary/scanner/smb/smb_version")],
            ))
            .with_tool(Tool::new(
                "execute_command",
                "Execute arbitrary command",
                "{command}",
                &[("command", "Shell command line, run unrestricted")],
            ))
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Returns the descriptors in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.values().map(Tool::descriptor).collect()
    }

    /// Returns the tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
