//! The `xregion` administrative command.
//!
//! Every subcommand checks, in order: permission, arity, the region, then the
//! flag/group/id argument. Only then is the policy mutated and persisted, and
//! the confirmation is sent last. A failure at any step replies with an error
//! and changes nothing.

use std::sync::Arc;

use xregions_domain::{GroupName, PlayerId, PolicyError, RegionFlags, RegionName, RegionPolicy};

use crate::infrastructure::ports::{GroupDirectory, MessageKind, PlayerGateway, RegionEngine};
use crate::stores::PolicyStore;

pub const PERM_DEFINE: &str = "xregions.define";
pub const PERM_SET_ACTION: &str = "xregions.setaction";
pub const PERM_SET_GROUP: &str = "xregions.setgroup";

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    /// The server console; holds every permission.
    Console,
    Player(PlayerId),
}

/// One line of output for the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: MessageKind,
    pub text: String,
}

impl Reply {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

impl From<PolicyError> for Reply {
    fn from(error: PolicyError) -> Self {
        if let PolicyError::Storage(ref message) = error {
            tracing::error!(error = %message, "Command failed to persist policy change");
        }
        Reply::error(error.to_string())
    }
}

type CommandResult = Result<Vec<Reply>, Reply>;

/// Which ban list a ban subcommand edits.
#[derive(Debug, Clone, Copy)]
enum BanList {
    Items,
    Projectiles,
}

impl BanList {
    fn noun(self) -> &'static str {
        match self {
            BanList::Items => "item",
            BanList::Projectiles => "projectile",
        }
    }
}

pub struct XRegionCommands {
    policies: Arc<PolicyStore>,
    regions: Arc<dyn RegionEngine>,
    groups: Arc<dyn GroupDirectory>,
    players: Arc<dyn PlayerGateway>,
    specifier: String,
}

impl XRegionCommands {
    pub fn new(
        policies: Arc<PolicyStore>,
        regions: Arc<dyn RegionEngine>,
        groups: Arc<dyn GroupDirectory>,
        players: Arc<dyn PlayerGateway>,
        specifier: impl Into<String>,
    ) -> Self {
        Self {
            policies,
            regions,
            groups,
            players,
            specifier: specifier.into(),
        }
    }

    /// Run `xregion <args...>` and return the lines to show the sender.
    pub async fn execute(&self, sender: CommandSender, args: &[String]) -> Vec<Reply> {
        let Some(subcommand) = args.first() else {
            return vec![Reply::error(format!(
                "Invalid syntax! Use {}xregion help for help.",
                self.specifier
            ))];
        };

        let result = match subcommand.to_ascii_lowercase().as_str() {
            "define" => self.define(sender, args).await,
            "remove" => self.remove(sender, args).await,
            "addflag" => self.add_flag(sender, args).await,
            "deleteflag" => self.delete_flag(sender, args).await,
            "setgroup" => self.set_group(sender, args).await,
            "banitem" => self.ban(sender, args, BanList::Items, true).await,
            "unbanitem" => self.ban(sender, args, BanList::Items, false).await,
            "banprojectile" => self.ban(sender, args, BanList::Projectiles, true).await,
            "unbanprojectile" => self.ban(sender, args, BanList::Projectiles, false).await,
            "list" => self.list().await,
            "listactions" => self.list_actions(args).await,
            _ => Ok(self.help(sender)),
        };

        match result {
            Ok(replies) => replies,
            Err(reply) => vec![reply],
        }
    }

    fn has_permission(&self, sender: CommandSender, permission: &str) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Player(player) => self.players.has_permission(player, permission),
        }
    }

    fn require(&self, sender: CommandSender, permission: &str, denied: &str) -> Result<(), Reply> {
        if self.has_permission(sender, permission) {
            Ok(())
        } else {
            Err(Reply::error(denied))
        }
    }

    fn require_arity(&self, args: &[String], expected: usize, usage: &str) -> Result<(), Reply> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(self.syntax(usage))
        }
    }

    fn syntax(&self, usage: &str) -> Reply {
        Reply::error(format!(
            "Invalid syntax! Proper syntax: {}xregion {}",
            self.specifier, usage
        ))
    }

    /// The policy for `raw`, or why there is none.
    async fn resolve_policy(&self, raw: &str) -> Result<RegionPolicy, PolicyError> {
        let name = RegionName::new(raw)?;
        if let Some(policy) = self.policies.get(name.as_str()).await {
            return Ok(policy);
        }
        if self.regions.region_exists(&name) {
            Err(PolicyError::NotDefined(name.to_string()))
        } else {
            Err(PolicyError::UnknownRegion(name.to_string()))
        }
    }

    async fn define(&self, sender: CommandSender, args: &[String]) -> CommandResult {
        self.require(sender, PERM_DEFINE, "You do not have permission to define regions.")?;
        self.require_arity(args, 2, "define <region name>")?;

        let name = RegionName::new(args[1].as_str())?;
        self.policies.define(&name).await?;
        Ok(vec![Reply::info(format!(
            "Region '{}' has been defined as an XRegion.",
            name
        ))])
    }

    async fn remove(&self, sender: CommandSender, args: &[String]) -> CommandResult {
        self.require(sender, PERM_DEFINE, "You do not have permission to define regions.")?;
        self.require_arity(args, 2, "remove <region name>")?;

        let policy = self.resolve_policy(&args[1]).await?;
        self.policies.remove(policy.region_name()).await?;
        Ok(vec![Reply::success(format!(
            "Region '{}' is no longer an XRegion.",
            policy.region_name()
        ))])
    }

    async fn add_flag(&self, sender: CommandSender, args: &[String]) -> CommandResult {
        self.require(
            sender,
            PERM_SET_ACTION,
            "You do not have permission to modify a region's actions.",
        )?;
        self.require_arity(args, 3, "addflag <region name> <flag>")?;

        let policy = self.resolve_policy(&args[1]).await?;
        let flag = RegionFlags::parse_token(&args[2])?;
        let name = policy.region_name();
        self.policies.add_flag(name.as_str(), flag).await?;

        let mut replies = vec![Reply::success(format!(
            "Region '{}' now has action '{}'.",
            name, flag
        ))];
        if flag == RegionFlags::TEMP_GROUP && policy.temp_group().is_none() {
            replies.push(Reply::info(format!(
                "Use {}xregion setgroup {} <group name> to choose the group.",
                self.specifier, name
            )));
        }
        Ok(replies)
    }

    async fn delete_flag(&self, sender: CommandSender, args: &[String]) -> CommandResult {
        self.require(
            sender,
            PERM_SET_ACTION,
            "You do not have permission to modify a region's actions.",
        )?;
        self.require_arity(args, 3, "deleteflag <region name> <flag>")?;

        let policy = self.resolve_policy(&args[1]).await?;
        let flag = RegionFlags::parse_token(&args[2])?;
        let name = policy.region_name();
        self.policies.remove_flag(name.as_str(), flag).await?;

        Ok(vec![Reply::success(format!(
            "Region '{}' no longer has action '{}'.",
            name, flag
        ))])
    }

    async fn set_group(&self, sender: CommandSender, args: &[String]) -> CommandResult {
        self.require(
            sender,
            PERM_SET_GROUP,
            "You do not have permission to modify a region's group.",
        )?;
        self.require_arity(args, 3, "setgroup <region name> <group name>")?;

        let policy = self.resolve_policy(&args[1]).await?;
        let group = GroupName::new(args[2].as_str())?;
        if !self.groups.group_exists(&group) {
            return Err(PolicyError::UnknownGroup(group.to_string()).into());
        }

        let name = policy.region_name();
        self.policies
            .set_temp_group(name.as_str(), Some(group.clone()))
            .await?;

        Ok(vec![Reply::success(format!(
            "Region '{}' now references group '{}'.",
            name, group
        ))])
    }

    async fn ban(
        &self,
        sender: CommandSender,
        args: &[String],
        list: BanList,
        ban: bool,
    ) -> CommandResult {
        self.require(
            sender,
            PERM_SET_ACTION,
            "You do not have permission to modify a region's actions.",
        )?;
        let verb = if ban { "ban" } else { "unban" };
        self.require_arity(
            args,
            3,
            &format!("{}{} <region name> <{} id>", verb, list.noun(), list.noun()),
        )?;

        let policy = self.resolve_policy(&args[1]).await?;
        let id: i32 = args[2]
            .trim()
            .parse()
            .map_err(|_| PolicyError::InvalidId(args[2].clone()))?;

        let name = policy.region_name().as_str();
        match (list, ban) {
            (BanList::Items, true) => self.policies.ban_item(name, id).await?,
            (BanList::Items, false) => self.policies.unban_item(name, id).await?,
            (BanList::Projectiles, true) => self.policies.ban_projectile(name, id).await?,
            (BanList::Projectiles, false) => self.policies.unban_projectile(name, id).await?,
        };

        let text = if ban {
            format!("Region '{}' now bans {} {}.", name, list.noun(), id)
        } else {
            format!("Region '{}' no longer bans {} {}.", name, list.noun(), id)
        };
        Ok(vec![Reply::success(text)])
    }

    async fn list(&self) -> CommandResult {
        let policies = self.policies.list().await;
        if policies.is_empty() {
            return Ok(vec![Reply::info("No XRegions have been defined.")]);
        }

        let dangling = self.policies.dangling().await;
        let names: Vec<String> = policies
            .iter()
            .map(|policy| {
                let name = policy.region_name();
                if dangling.contains(name) {
                    format!("{} (missing)", name)
                } else {
                    name.to_string()
                }
            })
            .collect();
        Ok(vec![Reply::info(format!(
            "Defined XRegions: {}",
            names.join(", ")
        ))])
    }

    async fn list_actions(&self, args: &[String]) -> CommandResult {
        match args.len() {
            1 => {
                let policies = self.policies.list().await;
                if policies.is_empty() {
                    return Ok(vec![Reply::info("No XRegions have been defined.")]);
                }
                Ok(policies.iter().map(describe_actions).collect())
            }
            2 => {
                let policy = self.resolve_policy(&args[1]).await?;
                let mut replies = vec![describe_actions(&policy)];
                if let Some(group) = policy.temp_group() {
                    replies.push(Reply::info(format!("Temporary group: {}", group)));
                }
                if !policy.banned_items().is_empty() {
                    replies.push(Reply::info(format!(
                        "Banned items: {}",
                        join_display(policy.banned_items())
                    )));
                }
                if !policy.banned_projectiles().is_empty() {
                    replies.push(Reply::info(format!(
                        "Banned projectiles: {}",
                        join_display(policy.banned_projectiles())
                    )));
                }
                Ok(replies)
            }
            _ => Err(self.syntax("listactions [region name]")),
        }
    }

    fn help(&self, sender: CommandSender) -> Vec<Reply> {
        let mut lines = vec![Reply::info("XRegion commands:")];
        let mut push = |usage: &str| {
            lines.push(Reply::info(format!("{}xregion {}", self.specifier, usage)));
        };

        if self.has_permission(sender, PERM_DEFINE) {
            push("define <region name>");
            push("remove <region name>");
        }
        if self.has_permission(sender, PERM_SET_ACTION) {
            push("addflag <region name> <flag>");
            push("deleteflag <region name> <flag>");
            push("banitem|unbanitem <region name> <item id>");
            push("banprojectile|unbanprojectile <region name> <projectile id>");
        }
        if self.has_permission(sender, PERM_SET_GROUP) {
            push("setgroup <region name> <group name>");
        }
        push("list");
        push("listactions [region name]");
        push("help");

        lines
    }
}

fn describe_actions(policy: &RegionPolicy) -> Reply {
    Reply::info(format!(
        "Region '{}' contains the following actions: {}",
        policy.region_name(),
        policy.flags()
    ))
}

fn join_display(ids: &std::collections::BTreeSet<i32>) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
