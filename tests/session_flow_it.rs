// self
use metadata_session::{
	_preludet::*,
	collab::CollaboratorError,
	metadata::{AnnouncementCandidate, MetadataUpdate, ProfileMetadata},
	session::{NotificationEvent, NotificationKind, SessionPhase, Title},
};

#[tokio::test]
async fn full_session_cycle_renders_expected_screens() {
	let (controller, identity, metadata) = build_test_controller();
	let first = controller.render();

	assert_eq!(first.title, Title::Initial);
	assert!(first.login_button_visible);
	assert!(!first.user_panel_visible());

	identity.push_login(Ok(fake_credentials("auth0|42", "tok123")));
	metadata.push_read(Ok(ProfileMetadata::new(
		"Every day is a fresh start",
		AnnouncementCandidate::displayed("Read the news", "https://example.com/news"),
	)));
	controller.login().await;

	let signed_in = controller.render();

	assert_eq!(controller.phase(), SessionPhase::Authenticated);
	assert_eq!(signed_in.title, Title::LoggedIn);
	assert!(signed_in.logout_button_visible);
	assert_eq!(
		signed_in.user_panel.as_ref().map(|p| p.name.as_str()),
		Some("Ada Lovelace")
	);
	assert_eq!(signed_in.affirmation_editor.as_deref(), Some("Every day is a fresh start"));
	assert_eq!(
		signed_in.announcement.as_ref().map(|a| a.url.as_str()),
		Some("https://example.com/news")
	);
	assert_eq!(metadata.reads().len(), 1, "Login must trigger exactly one metadata fetch.");

	controller.save_affirmation("  Keep going ").await;

	assert_eq!(
		metadata.writes()[0],
		RecordedWrite {
			user_id: "auth0|42".into(),
			access_token: "tok123".into(),
			update: MetadataUpdate::affirmation("Keep going"),
		}
	);

	controller.logout().await;

	let signed_out = controller.render();

	assert_eq!(signed_out.title, Title::LoggedOut);
	assert!(signed_out.login_button_visible);
	assert!(!signed_out.affirmation_editor_visible());
	assert!(!signed_out.announcement_button_visible());
	assert!(controller.with_model(|m| m.state().access_token().is_none()));

	let events: Vec<_> = controller.take_notifications().into_iter().map(|n| n.event).collect();

	assert_eq!(events, vec![NotificationEvent::LoginSucceeded, NotificationEvent::MetadataSaved]);
}

#[tokio::test]
async fn requests_while_signed_out_are_no_ops() {
	let (controller, identity, metadata) = build_test_controller();

	controller.refresh_metadata().await;
	controller.save_affirmation("hello").await;
	controller.logout().await;

	assert!(metadata.reads().is_empty());
	assert!(metadata.writes().is_empty());
	assert!(identity.logout_requests().is_empty());
	assert_eq!(controller.phase(), SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn concurrent_login_requests_reach_the_provider_once() {
	let (controller, identity, _) = build_test_controller();

	identity.push_login(Ok(fake_credentials("auth0|42", "tok123")));
	tokio::join!(controller.login(), controller.login());

	assert_eq!(identity.login_requests().len(), 1);
	assert_eq!(controller.phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn metadata_failures_surface_as_notifications() {
	let (controller, identity, metadata) = build_test_controller();

	identity.push_login(Ok(fake_credentials("auth0|42", "tok123")));
	metadata.push_read(Err(CollaboratorError::with_code(429, "Too many requests.")));
	controller.login().await;

	assert_eq!(controller.phase(), SessionPhase::Authenticated);

	let notifications = controller.take_notifications();
	let failure = notifications
		.iter()
		.find(|n| n.event == NotificationEvent::MetadataReadFailed)
		.expect("Metadata failure should be reported.");

	assert_eq!(failure.kind, NotificationKind::Failure);
	assert_eq!(failure.code, Some(429));
	assert_eq!(failure.message, "Something went wrong (code 429).");
}
