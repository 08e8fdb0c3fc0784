//! The proxy's configuration tree

use super::node::{
    Annotate, NumberNode, SchemaNode, StringNode, array, boolean, number, object, string,
};
use serde_json::json;
use std::sync::LazyLock;

static CONFIG_SCHEMA: LazyLock<SchemaNode> = LazyLock::new(build);

/// The full configuration schema, built once and shared read-only
pub fn config_schema() -> &'static SchemaNode {
    &CONFIG_SCHEMA
}

fn username() -> StringNode {
    string().min(3).max(16).token()
}

fn port(default: u16, description: &str) -> NumberNode {
    number()
        .integer()
        .min(1.0)
        .max(65535.0)
        .default(default)
        .describe(description)
}

fn webhook(description: &str) -> StringNode {
    string()
        .pattern(r"^https://\S+$", "https URL")
        .allow_empty()
        .default("")
        .describe(description)
}

fn build() -> SchemaNode {
    object()
        .field(
            "account",
            object()
                .describe("Minecraft account used to join the server")
                .field(
                    "username",
                    username()
                        .required()
                        .describe("In-game name, also used as this instance's identity"),
                )
                .field(
                    "password",
                    string()
                        .allow_empty()
                        .default("")
                        .describe("Account password, only used with mojang auth"),
                )
                .field(
                    "auth",
                    string()
                        .one_of(["microsoft", "mojang", "offline"])
                        .default("microsoft")
                        .describe("Authentication flow"),
                ),
        )
        .field(
            "server",
            object()
                .describe("Remote server the session connects to")
                .field(
                    "host",
                    string()
                        .default("connect.2b2t.org")
                        .describe("Server hostname"),
                )
                .field("port", port(25565, "Server port"))
                .field(
                    "version",
                    string()
                        .pattern(r"^\d+\.\d+(\.\d+)?$", "minecraft version")
                        .default("1.12.2")
                        .describe("Protocol version to speak"),
                ),
        )
        .field(
            "proxy",
            object()
                .describe("Local endpoint a controlling client connects to")
                .field(
                    "active",
                    boolean()
                        .default(true)
                        .describe("Accept controlling clients"),
                )
                .field("port", port(25566, "Port the proxy listens on"))
                .field(
                    "loopbackAddress",
                    string()
                        .default("127.0.0.1")
                        .describe("Address the proxy binds to"),
                )
                .field(
                    "onlineMode",
                    boolean()
                        .default(true)
                        .describe("Authenticate controlling clients with Mojang"),
                )
                .field(
                    "whitelist",
                    array(username())
                        .describe("Usernames allowed to control the session; empty allows everyone"),
                )
                .field(
                    "ignoredPackets",
                    array(
                        string()
                            .pattern(r"^[a-z_]+$", "lowercase letters and underscores")
                            .lowercase(),
                    )
                    .describe("Packet names never relayed to the controlling client"),
                ),
        )
        .field(
            "queueThreshold",
            number()
                .integer()
                .positive()
                .default(21)
                .describe("Queue position at which notifications start"),
        )
        .field(
            "reconnectInterval",
            number()
                .positive()
                .default(69)
                .describe("Seconds to wait before reconnecting after a disconnect"),
        )
        .field(
            "uncleanDisconnectInterval",
            number()
                .positive()
                .default(196)
                .describe("Seconds to wait after an unexpected disconnect"),
        )
        .field(
            "mineflayer",
            object()
                .describe("In-game bot that holds the session between controllers")
                .field(
                    "active",
                    boolean()
                        .default(true)
                        .describe("Keep a bot in the session while no controller is attached"),
                )
                .field(
                    "autoEat",
                    object()
                        .describe("Automatic eating")
                        .field(
                            "active",
                            boolean().default(true).describe("Eat when hungry"),
                        )
                        .field(
                            "minHunger",
                            number()
                                .integer()
                                .min(0.0)
                                .max(20.0)
                                .default(15)
                                .describe("Food level that triggers eating"),
                        )
                        .field(
                            "bannedFood",
                            array(string())
                                .default(json!(["rotten_flesh", "pufferfish", "spider_eye"]))
                                .describe("Items never eaten"),
                        ),
                )
                .field(
                    "antiAfk",
                    object()
                        .describe("Anti-idle movement so the server does not kick the bot")
                        .field(
                            "active",
                            boolean().default(true).describe("Move periodically"),
                        )
                        .field(
                            "actionInterval",
                            number()
                                .integer()
                                .positive()
                                .default(15000)
                                .describe("Milliseconds between anti-idle actions"),
                        ),
                ),
        )
        .field(
            "tunnel",
            object()
                .describe("Public tunnel exposing the proxy port")
                .field("active", boolean().default(false).describe("Open a tunnel"))
                .field(
                    "authToken",
                    string()
                        .allow_empty()
                        .default("")
                        .describe("Tunnel provider auth token"),
                )
                .field(
                    "region",
                    string()
                        .one_of(["us", "eu", "ap", "au", "sa", "jp", "in"])
                        .default("us")
                        .describe("Tunnel region"),
                ),
        )
        .field(
            "discord",
            object().describe("Discord notifications").field(
                "webhooks",
                object()
                    .describe("Webhook URLs; leave empty to disable")
                    .field("status", webhook("Webhook receiving queue status updates"))
                    .field("livechat", webhook("Webhook receiving relayed chat")),
            ),
        )
        .field(
            "coordination",
            object()
                .describe("Sharing a master config and the relay role between instances")
                .field(
                    "active",
                    boolean()
                        .default(false)
                        .describe("Take part in multi-instance coordination"),
                )
                .field(
                    "path",
                    string()
                        .default("./coordination")
                        .describe("Directory shared by cooperating instances"),
                ),
        )
        .field(
            "dashboard",
            object()
                .describe("Terminal status dashboard")
                .field(
                    "active",
                    boolean()
                        .default(true)
                        .describe("Render the status dashboard in the terminal"),
                )
                .field(
                    "refreshInterval",
                    number()
                        .integer()
                        .min(100.0)
                        .max(60000.0)
                        .default(1000)
                        .describe("Milliseconds between dashboard refreshes"),
                ),
        )
        .into_node()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Kind;

    #[test]
    fn test_every_leaf_has_default_or_is_required() {
        assert!(config_schema().check_defaults().is_empty());
    }

    #[test]
    fn test_top_level_sections() {
        let SchemaNode::Object(root) = config_schema() else {
            panic!("root must be an object");
        };
        let names: Vec<&str> = root.fields.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "account",
                "server",
                "proxy",
                "queueThreshold",
                "reconnectInterval",
                "uncleanDisconnectInterval",
                "mineflayer",
                "tunnel",
                "discord",
                "coordination",
                "dashboard",
            ]
        );
    }

    #[test]
    fn test_username_is_the_only_required_field() {
        let mut required = Vec::new();
        config_schema().walk(&mut |path, node| {
            if node.is_required() {
                required.push(path.join("."));
            }
        });
        assert_eq!(required, vec!["account.username"]);
    }

    #[test]
    fn test_ignored_packets_element_shape() {
        let node = config_schema().lookup("proxy.ignoredPackets").unwrap();
        let SchemaNode::Array(array) = node else {
            panic!("ignoredPackets must be an array");
        };
        assert_eq!(array.items.kind(), Kind::String);
    }
}
