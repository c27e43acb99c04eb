//! Step definitions for topic creation and publishing.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::helpers::assertions::assert_rejected_with;
use crate::bdd::types::{MessageText, TopicMemo};
use anyhow::{Context, Result, ensure};
use ledger_steps::accounts::Participant;
use ledger_steps::scenario::SubmitKeyChoice;
use ledger_steps::status::Status;
use rstest_bdd_macros::{given, then, when};
use tracing::info;

fn create_topic(world: &TestWorld, memo: &TopicMemo, submit_key: SubmitKeyChoice) -> Result<()> {
    world.scenario(|ctx| {
        let receipt = ctx
            .create_topic(memo.as_str(), submit_key)
            .with_context(|| format!("creating topic '{memo}'"))?;
        ensure!(receipt.status == Status::Success, "topic create returned {}", receipt.status);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("A {required:u32} of {total:usize} threshold key with the first and second account")]
fn threshold_key(world: &TestWorld, required: u32, total: usize) -> Result<()> {
    let members = [Participant::First, Participant::Second];
    ensure!(
        total == members.len(),
        "the threshold key is built from {} accounts, not {total}",
        members.len()
    );
    world.scenario(|ctx| {
        ctx.create_threshold_key(required, &members)?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("A topic is created with the memo {memo:string} with the threshold key as the submit key")]
fn topic_with_threshold_key(world: &TestWorld, memo: &str) -> Result<()> {
    create_topic(world, &TopicMemo::new(memo), SubmitKeyChoice::ThresholdKey)
}

#[when("A topic is created with the memo {memo:string} with the first account as the submit key")]
fn topic_with_first_account(world: &TestWorld, memo: &str) -> Result<()> {
    create_topic(
        world,
        &TopicMemo::new(memo),
        SubmitKeyChoice::Account(Participant::First),
    )
}

#[when("The message {message:string} is published to the topic")]
fn publish(world: &TestWorld, message: &str) -> Result<()> {
    let text = MessageText::new(message);
    world.scenario(|ctx| {
        let receipt = ctx
            .publish_message(text.as_str(), &[Participant::First])
            .with_context(|| format!("publishing '{text}'"))?;
        ensure!(receipt.status == Status::Success, "publish returned {}", receipt.status);
        ensure!(
            receipt.topic_sequence_number.is_some(),
            "publish receipt should carry a sequence number"
        );
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("The message {message:string} is received by the topic and can be printed to the console")]
fn message_received(world: &TestWorld, message: &str) -> Result<()> {
    let expected = MessageText::new(message);
    world.scenario(|ctx| {
        let topic_id = ctx.fixtures().topic()?;
        let messages = ctx.topic_messages()?;
        let received = messages
            .iter()
            .find(|m| m.contents_lossy() == expected.as_str())
            .with_context(|| format!("topic {topic_id} never received '{expected}'"))?;
        info!(
            %topic_id,
            sequence = received.sequence_number,
            "{}",
            received.contents_lossy()
        );
        Ok(())
    })
}

#[then("An attempt to publish the message {message:string} signed only by the first account fails")]
fn publish_signed_by_first_fails(world: &TestWorld, message: &str) -> Result<()> {
    world.scenario(|ctx| {
        let outcome = ctx.publish_message(message, &[Participant::First]);
        assert_rejected_with(outcome, Status::InvalidSignature, "publishing")?;
        let messages = ctx.topic_messages()?;
        ensure!(messages.is_empty(), "rejected message should not reach the topic");
        Ok(())
    })
}

#[then("The topic has the memo {memo:string}")]
fn topic_memo(world: &TestWorld, memo: &str) -> Result<()> {
    let expected = TopicMemo::new(memo);
    world.scenario(|ctx| {
        let info = ctx.topic_info()?;
        ensure!(
            info.memo == expected.as_str(),
            "topic memo is '{}', expected '{expected}'",
            info.memo
        );
        Ok(())
    })
}
