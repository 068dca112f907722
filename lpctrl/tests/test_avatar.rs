use lpcore::{
    ac::Agent,
    update::ProfileUpdate,
};
use lpctrl::{
    error::Error,
    platform::Builder,
    storage::LocalFileStorage,
};
use std::sync::Arc;
use test_lp::ctrl::{
    braxton_update,
    create_sqlite_backend,
    create_sqlite_platform,
};

#[tokio::test]
async fn replace_and_destroy() -> anyhow::Result<()> {
    let (tempdir, platform) = create_sqlite_platform().await?;
    let user = platform.create_user("braxton").await?;
    let agent = Agent::from(user.clone());

    // the profile is created on demand
    let profile = platform.update_avatar(&agent, "face.PNG", b"first image").await?;
    let first = profile.avatar.clone().expect("avatar should be set");
    assert!(first.starts_with("avatars/"));
    assert!(first.ends_with(".png"));
    assert_eq!(std::fs::read(tempdir.path().join(&first))?, b"first image");
    assert_eq!(
        platform.get_profile(user.id).await?.profile.avatar.as_deref(),
        Some(first.as_str()),
    );

    let profile = platform.update_avatar(&agent, "face.gif", b"second image").await?;
    let second = profile.avatar.clone().expect("avatar should be set");
    assert_ne!(first, second);
    assert!(!tempdir.path().join(&first).exists());
    assert!(tempdir.path().join(&second).exists());

    let profile = platform.destroy_avatar(&agent).await?;
    assert_eq!(profile.avatar, None);
    assert!(!tempdir.path().join(&second).exists());
    assert_eq!(platform.get_profile(user.id).await?.profile.avatar, None);

    // nothing left to remove
    assert_eq!(platform.destroy_avatar(&agent).await?.avatar, None);
    Ok(())
}

#[tokio::test]
async fn avatar_of_another_user() -> anyhow::Result<()> {
    let (tempdir, platform) = create_sqlite_platform().await?;
    let owner = platform.create_user("owner").await?;
    let owner_agent = Agent::from(owner.clone());
    let other = Agent::from(platform.create_user("other").await?);

    let path = platform.update_avatar(&owner_agent, "face.png", b"image").await?
        .avatar
        .expect("avatar should be set");

    // the path in the payload has no effect on the profile
    let mut payload = serde_json::to_value(braxton_update())?;
    payload["avatar"] = serde_json::json!(path);
    let update: ProfileUpdate = serde_json::from_value(payload)?;
    let aggregate = platform.update_profile(&other, &update).await?;
    assert_eq!(aggregate.profile.avatar, None);

    assert_eq!(platform.destroy_avatar(&other).await?.avatar, None);
    assert!(tempdir.path().join(&path).exists());
    assert_eq!(
        platform.get_profile(owner.id).await?.profile.avatar.as_deref(),
        Some(path.as_str()),
    );
    Ok(())
}

#[tokio::test]
async fn destroy_without_profile() -> anyhow::Result<()> {
    let (_tempdir, platform) = create_sqlite_platform().await?;
    let agent = Agent::from(platform.create_user("braxton").await?);
    assert!(matches!(
        platform.destroy_avatar(&agent).await,
        Err(Error::NotFound(_)),
    ));
    assert!(matches!(
        platform.destroy_avatar(&Agent::Anonymous).await,
        Err(Error::Authorization(_)),
    ));
    Ok(())
}

#[tokio::test]
async fn rejected_uploads() -> anyhow::Result<()> {
    let tempdir = tempfile::tempdir()?;
    let platform = Builder::new()
        .lp_platform(Arc::new(create_sqlite_backend().await?))
        .storage(LocalFileStorage::new(tempdir.path()))
        .avatar_max_size(1)
        .build()?;
    let user = platform.create_user("braxton").await?;
    let agent = Agent::from(user.clone());

    for (filename, contents, message) in [
        ("face.bmp", &b"image"[..], "The avatar field must be a file of type: jpeg, png, jpg, gif."),
        ("face", &b"image"[..], "The avatar field must be a file of type: jpeg, png, jpg, gif."),
        ("face.jpg", &[0u8; 1025][..], "The avatar field must not be greater than 1 kilobytes."),
        ("face.jpg", &b""[..], "The avatar field is required."),
    ] {
        match platform.update_avatar(&agent, filename, contents).await {
            Err(Error::Validation(errors)) => assert_eq!(
                errors.get("avatar"),
                Some(&[message.to_string()][..]),
            ),
            other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
        }
    }
    // no profile was created by any of the above
    assert!(matches!(
        platform.get_profile(user.id).await,
        Err(Error::NotFound(_)),
    ));
    assert!(!tempdir.path().join("avatars").exists());

    platform.update_avatar(&agent, "face.jpeg", &[0u8; 1024]).await?;
    assert!(tempdir.path().join("avatars").exists());
    Ok(())
}
