//! Built-in command handlers.

use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::router::{CommandHandler, InboundEvent};
use crate::roles::tiers::TierTable;
use crate::store::records::WalletRecordStore;
use crate::store::types::AccountMeta;
use crate::workflow::address::extract_address;
use crate::workflow::check::WalletCheck;
use crate::workflow::identity::{parse_user_ref, Directory};
use crate::workflow::link::{LinkOutcome, WalletLinkWorkflow};

/// `linkwallet <ADDRESS>`: link a wallet to the caller's own account.
pub struct LinkWalletHandler {
    pub workflow: Arc<WalletLinkWorkflow>,
    pub explorer_url_base: String,
}

#[async_trait]
impl CommandHandler for LinkWalletHandler {
    fn name(&self) -> &'static str {
        "linkwallet"
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("link wallet") || event.lowered.contains("linkwallet")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let outcome = self
            .workflow
            .link(&event.caller.id, &event.caller.meta(), &event.text)
            .await;
        outcome.user_message(&self.explorer_url_base)
    }
}

/// `adminlinkwallet <ADDRESS> <USER#TAG>`: link a wallet to another
/// account, reassigning the address if someone else claimed it. The router
/// has already verified the caller is an admin.
pub struct AdminLinkWalletHandler {
    pub workflow: Arc<WalletLinkWorkflow>,
    pub directory: Arc<dyn Directory>,
    pub explorer_url_base: String,
}

impl AdminLinkWalletHandler {
    /// Resolve the target account: a structured target id wins, otherwise
    /// the trailing `Name#1234` reference is looked up in the directory.
    async fn resolve_target(&self, event: &InboundEvent) -> Option<(String, AccountMeta)> {
        if let Some(target) = &event.target {
            if let Some((username, discriminator)) = parse_user_ref(target) {
                let id = self
                    .directory
                    .lookup_account_id(username, discriminator)
                    .await?;
                return Some((
                    id,
                    AccountMeta {
                        username: username.to_string(),
                        discriminator: discriminator.to_string(),
                    },
                ));
            }
            // A bare id from a structured interaction.
            return Some((target.clone(), AccountMeta::default()));
        }

        let reference = event
            .text
            .split_whitespace()
            .find_map(|token| parse_user_ref(token))?;
        let id = self
            .directory
            .lookup_account_id(reference.0, reference.1)
            .await?;
        Some((
            id,
            AccountMeta {
                username: reference.0.to_string(),
                discriminator: reference.1.to_string(),
            },
        ))
    }
}

#[async_trait]
impl CommandHandler for AdminLinkWalletHandler {
    fn name(&self) -> &'static str {
        "adminlinkwallet"
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("admin link wallet") || event.lowered.contains("adminlinkwallet")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let Some((target_id, meta)) = self.resolve_target(event).await else {
            return "Could not find that user, please check the name and try again with \
                    'adminlinkwallet WALLETADDRESSHERE USER#NUMBER'"
                .to_string();
        };

        let outcome = self
            .workflow
            .link_as_admin(&target_id, &meta, &event.text)
            .await;

        match outcome {
            LinkOutcome::Linked { points, .. } => format!(
                "I see their {} points admin! Linked 🔗",
                crate::workflow::address::format_points(points)
            ),
            other => other.user_message(&self.explorer_url_base),
        }
    }
}

/// `admindeletewallet <ADDRESS>`: remove a wallet from the system and
/// resync the previous owner's roles.
pub struct AdminDeleteWalletHandler {
    pub workflow: Arc<WalletLinkWorkflow>,
}

#[async_trait]
impl CommandHandler for AdminDeleteWalletHandler {
    fn name(&self) -> &'static str {
        "admindeletewallet"
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("admin delete wallet")
            || event.lowered.contains("admindeletewallet")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        self.workflow.remove(&event.text).await.user_message()
    }
}

/// `getusers <ROLENAME>`: list the users whose points grant a role.
/// Registered before the `getuser` handler because its trigger text
/// contains the shorter trigger.
pub struct GetUsersForRoleHandler {
    pub store: Arc<WalletRecordStore>,
    pub tiers: TierTable,
}

#[async_trait]
impl CommandHandler for GetUsersForRoleHandler {
    fn name(&self) -> &'static str {
        "getusers"
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("get users") || event.lowered.contains("getusers")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let role = event
            .text
            .split_whitespace()
            .last()
            .filter(|name| self.tiers.contains_role(name));
        let Some(role) = role else {
            return "Cant find a role with that name, please check the spelling and try again \
                    with command as 'getusers ROLENAME'"
                .to_string();
        };

        let mut reply = format!("Users in {}:\n", role);
        for record in self.store.accounts_snapshot() {
            if self.tiers.tiers_for(record.total_points).contains(&role) {
                reply.push_str(&format!("\n{}#{}", record.username, record.discriminator));
            }
        }
        reply
    }
}

/// `getwallet <USER#TAG>`: list the wallet addresses linked to a user.
pub struct GetWalletHandler {
    pub store: Arc<WalletRecordStore>,
    pub directory: Arc<dyn Directory>,
}

#[async_trait]
impl CommandHandler for GetWalletHandler {
    fn name(&self) -> &'static str {
        "getwallet"
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("get wallet") || event.lowered.contains("getwallet")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let Some((username, discriminator)) =
            event.text.split_whitespace().find_map(parse_user_ref)
        else {
            return "Could not get the user, please check the name and try again with \
                    'getwallet USER#NUMBER'"
                .to_string();
        };
        let Some(id) = self
            .directory
            .lookup_account_id(username, discriminator)
            .await
        else {
            return "Could not find that user, please check the name and try again with \
                    'getwallet USER#NUMBER'"
                .to_string();
        };

        let wallets = self.store.wallets_for_account(&id);
        if wallets.is_empty() {
            return "That user has no wallets linked yet".to_string();
        }

        let mut reply = format!("Wallets for {}#{}:\n", username, discriminator);
        for wallet in &wallets {
            reply.push_str(&format!("\n{}", wallet.address));
        }
        reply
    }
}

/// `getuser <ADDRESS>`: report which user a wallet is linked to.
pub struct GetUserHandler {
    pub store: Arc<WalletRecordStore>,
}

#[async_trait]
impl CommandHandler for GetUserHandler {
    fn name(&self) -> &'static str {
        "getuser"
    }

    fn admin_only(&self) -> bool {
        true
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("get user") || event.lowered.contains("getuser")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let Some(address) = extract_address(&event.text) else {
            return "Could not get the wallet address, please check the format and try again \
                    with 'getuser WALLETADDRESSHERE'"
                .to_string();
        };

        self.store
            .account_for_address(address)
            .and_then(|owner| self.store.get_account(&owner))
            .map(|record| {
                format!(
                    "The wallet belongs to {}#{}",
                    record.username, record.discriminator
                )
            })
            .unwrap_or_else(|| {
                "Could not find that wallet in the system, please check the address and try \
                 again"
                    .to_string()
            })
    }
}

/// `checkwallet <ADDRESS>`: read-only holdings lookup.
pub struct CheckWalletHandler {
    pub check: WalletCheck,
    pub explorer_url_base: String,
}

#[async_trait]
impl CommandHandler for CheckWalletHandler {
    fn name(&self) -> &'static str {
        "checkwallet"
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("check wallet") || event.lowered.contains("checkwallet")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        self.check
            .check(&event.text)
            .await
            .user_message(&self.explorer_url_base)
    }
}

/// `help` / `commands`: command summary, with an admin section for admins.
pub struct HelpHandler {
    pub admin_ids: Arc<Vec<String>>,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        event.lowered.contains("help") || event.lowered.contains("commands")
    }

    async fn handle(&self, event: &InboundEvent) -> String {
        let mut reply = String::from(
            "You can\n\
             - Link a wallet to your account using: 'linkwallet WALLETADDRESSHERE'\n\
             - Check wallet points using: 'checkwallet WALLETADDRESSHERE'\n",
        );

        if self.admin_ids.iter().any(|id| id == &event.caller.id) {
            reply.push_str(
                "\nAdmin commands\n\
                 - Link a wallet to a user account using: 'adminlinkwallet WALLETADDRESSHERE \
                 USER#NUMBER'\n\
                 - Delete a wallet from the system using: 'admindeletewallet WALLETADDRESSHERE'\n\
                 - Get all users in a role using: 'getusers ROLENAME'\n\
                 - Get a user's wallet addresses using: 'getwallet USER#NUMBER'\n\
                 - Get a wallet's user by address using: 'getuser WALLETADDRESSHERE'\n",
            );
        }

        reply
    }
}
