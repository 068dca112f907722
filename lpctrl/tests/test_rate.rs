use lpcore::{
    ac::Agent,
    rate::ChangeType,
    update::LanguagePairRateItem,
};
use lpctrl::error::{
    AuthorizationError,
    Error,
};
use rust_decimal::Decimal;
use test_lp::ctrl::create_sqlite_platform;

fn item() -> LanguagePairRateItem {
    LanguagePairRateItem {
        source_language_id: 2,
        target_language_id: 3,
        service_id: 2,
        proposed_rate: Some(Decimal::new(9, 2)),
        .. Default::default()
    }
}

#[tokio::test]
async fn propose_and_approve() -> anyhow::Result<()> {
    let (_tempdir, platform) = create_sqlite_platform().await?;
    let linguist = Agent::from(platform.create_user("linguist").await?);
    let admin = platform.create_user("admin").await?;
    let approver = Agent::from(admin.clone());

    // approval details cannot be smuggled in through a proposal
    let rate = platform.propose_rate(&linguist, &LanguagePairRateItem {
        final_rate: Some(Decimal::new(50, 0)),
        approved_by: Some(admin.id),
        .. item()
    }).await?;
    assert_eq!(rate.final_rate, None);
    assert_eq!(rate.approved_by, None);
    assert_eq!(rate.proposed_rate, Some(Decimal::new(9, 2)));
    assert_eq!(platform.pending_rates().await?.len(), 1);
    assert!(platform.rate_history(rate.id).await?.is_empty());

    let approved = platform.approve_rate(
        &approver,
        rate.id,
        Decimal::new(10, 0),
        Some("finance@example.com"),
    ).await?;
    assert_eq!(approved.final_rate.map(|r| r.to_string()).as_deref(), Some("10.00"));
    assert_eq!(approved.approved_by, Some(admin.id));
    assert_eq!(approved.approval_reference_email.as_deref(), Some("finance@example.com"));
    assert!(platform.pending_rates().await?.is_empty());

    // the same value again is not a change
    platform.approve_rate(&approver, rate.id, Decimal::new(1000, 2), None).await?;
    platform.approve_rate(&approver, rate.id, Decimal::new(12, 0), None).await?;

    let history = platform.rate_history(rate.id).await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_rate, None);
    assert_eq!(history[0].new_rate, Decimal::new(10, 0));
    assert_eq!(history[1].old_rate, Some(Decimal::new(10, 0)));
    assert_eq!(history[1].new_rate, Decimal::new(12, 0));
    assert!(history.iter().all(|entry| entry.changed_by == Some(admin.id)
        && entry.change_type == ChangeType::Approved));
    Ok(())
}

#[tokio::test]
async fn retraction_leaves_no_history() -> anyhow::Result<()> {
    let (_tempdir, platform) = create_sqlite_platform().await?;
    let linguist = Agent::from(platform.create_user("linguist").await?);
    let approver = Agent::from(platform.create_user("admin").await?);

    let rate = platform.propose_rate(&linguist, &item()).await?;
    platform.approve_rate(&approver, rate.id, Decimal::new(10, 0), None).await?;
    let retracted = platform.retract_rate(&approver, rate.id).await?;
    assert_eq!(retracted.final_rate, None);
    assert_eq!(retracted.approved_by, None);
    assert_eq!(platform.rate_history(rate.id).await?.len(), 1);
    assert_eq!(platform.pending_rates().await?[0].id, rate.id);
    Ok(())
}

#[tokio::test]
async fn rejected_proposals() -> anyhow::Result<()> {
    let (_tempdir, platform) = create_sqlite_platform().await?;
    let linguist = Agent::from(platform.create_user("linguist").await?);
    platform.propose_rate(&linguist, &item()).await?;

    let errors = match platform.propose_rate(&linguist, &item()).await {
        Err(Error::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["language_pair"]);

    let errors = match platform.propose_rate(&linguist, &LanguagePairRateItem {
        source_language_id: 99,
        proposed_rate: Some(Decimal::new(-1, 0)),
        .. item()
    }).await {
        Err(Error::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
    };
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec!["proposed_rate", "source_language_id"],
    );
    assert_eq!(
        errors.get("source_language_id"),
        Some(&["The selected source language id is invalid.".to_string()][..]),
    );

    // the same pair is still open to another linguist
    let other = Agent::from(platform.create_user("other").await?);
    platform.propose_rate(&other, &item()).await?;
    assert_eq!(platform.pending_rates().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn rejected_approvals() -> anyhow::Result<()> {
    let (_tempdir, platform) = create_sqlite_platform().await?;
    let linguist = Agent::from(platform.create_user("linguist").await?);
    let approver = Agent::from(platform.create_user("admin").await?);
    let rate = platform.propose_rate(&linguist, &item()).await?;

    assert!(matches!(
        platform.approve_rate(&Agent::Anonymous, rate.id, Decimal::ONE, None).await,
        Err(Error::Authorization(AuthorizationError::Anonymous)),
    ));
    match platform.approve_rate(&approver, rate.id, Decimal::NEGATIVE_ONE, Some("nobody")).await {
        Err(Error::Validation(errors)) => assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["approval_reference_email", "final_rate"],
        ),
        other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        platform.approve_rate(&approver, rate.id + 100, Decimal::ONE, None).await,
        Err(Error::NotFound(_)),
    ));
    assert!(matches!(
        platform.rate_history(rate.id + 100).await,
        Err(Error::NotFound(_)),
    ));
    assert!(platform.rate_history(rate.id).await?.is_empty());
    Ok(())
}
