//! Topic operations of the scenario context.

use super::{ScenarioContext, ScenarioError};
use crate::accounts::Participant;
use crate::keys::{Key, KeyList};
use crate::network::LedgerError;
use crate::query::{TopicInfo, TopicInfoQuery, TopicMessage, TopicMessageQuery};
use crate::transaction::{TopicCreateTransaction, TopicMessageSubmitTransaction, TransactionReceipt};
use tracing::info;

/// Which key guards message submission on a new topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKeyChoice {
    /// The participant's own key.
    Account(Participant),
    /// The threshold key stored in the fixture registry.
    ThresholdKey,
}

impl ScenarioContext {
    /// Build a `threshold`-of-n key over `members` and store it.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Key`] when `threshold` is zero or exceeds
    /// the member count, and [`ScenarioError::Config`] for unknown slots.
    pub fn create_threshold_key(
        &mut self,
        threshold: u32,
        members: &[Participant],
    ) -> Result<KeyList, ScenarioError> {
        let keys = members
            .iter()
            .map(|member| Ok(Key::from(self.identity(member.slot())?.public_key)))
            .collect::<Result<Vec<_>, ScenarioError>>()?;
        let list = KeyList::with_threshold(keys, threshold)?;
        self.fixtures_mut().set_threshold_key(list.clone());
        Ok(list)
    }

    /// Create a topic administered by the operator.
    ///
    /// The first participant co-signs the creation. The new topic becomes
    /// the scenario's current topic.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Ledger`] without an operator or when the
    /// ledger rejects the creation, and [`ScenarioError::Fixture`] when the
    /// threshold key was never built.
    pub fn create_topic(
        &mut self,
        memo: &str,
        submit_key: SubmitKeyChoice,
    ) -> Result<TransactionReceipt, ScenarioError> {
        let admin_key = self
            .client()
            .operator_public_key()
            .ok_or(LedgerError::OperatorNotSet)?;
        let submit = match submit_key {
            SubmitKeyChoice::Account(who) => Key::from(self.identity(who.slot())?.public_key),
            SubmitKeyChoice::ThresholdKey => Key::from(self.fixtures().threshold_key()?.clone()),
        };
        let tx = TopicCreateTransaction::new()
            .topic_memo(memo)
            .admin_key(admin_key)
            .submit_key(submit);
        let receipt = self.execute(tx, &[Participant::First.slot()])?;
        let topic_id = receipt.topic_id.ok_or(ScenarioError::IncompleteReceipt {
            operation: "topic create",
            field: "topic id",
        })?;
        self.fixtures_mut().set_topic(topic_id);
        Ok(receipt)
    }

    /// Publish `message` to the current topic, signed only by `signers`.
    ///
    /// The treasury pays for the submission so the bound operator never
    /// contributes a signature towards the submit key. The operator binding
    /// is restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a topic exists and
    /// [`ScenarioError::Ledger`] when the submission fails.
    pub fn publish_message(
        &mut self,
        message: &str,
        signers: &[Participant],
    ) -> Result<TransactionReceipt, ScenarioError> {
        let topic_id = self.fixtures().topic()?;
        let slots: Vec<usize> = signers.iter().copied().map(Participant::slot).collect();
        let payer = self.treasury_slot();
        let receipt = self.with_operator(payer, |as_payer| {
            as_payer.execute(
                TopicMessageSubmitTransaction::new(topic_id, message.as_bytes()),
                &slots,
            )
        })?;
        info!(%topic_id, message, "message published");
        Ok(receipt)
    }

    /// Messages published to the current topic.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a topic exists and
    /// [`ScenarioError::Ledger`] when the query fails.
    pub fn topic_messages(&self) -> Result<Vec<TopicMessage>, ScenarioError> {
        let topic_id = self.fixtures().topic()?;
        Ok(TopicMessageQuery::new(topic_id).execute(self.client())?)
    }

    /// State of the current topic.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a topic exists and
    /// [`ScenarioError::Ledger`] when the query fails.
    pub fn topic_info(&self) -> Result<TopicInfo, ScenarioError> {
        let topic_id = self.fixtures().topic()?;
        Ok(TopicInfoQuery::new(topic_id).execute(self.client())?)
    }
}
