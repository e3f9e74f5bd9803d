use crm_core::CrmClient;
use crm_core::dialogs::{
    DialogId, NewTaskContext, ParentLink, TaskEditMode, create_task, keys, open_task_editor,
};
use crm_core::fab::fab_options;
use crm_core::guard::GuardDecision;
use crm_core::route::Route;
use crm_core::session::{Role, SessionState};
use crm_core::url_state::{MemoryHistory, QueryParams, UrlHistory};
use crm_shared::{CrmUserDoc, TaskDoc, TaskProfile};
use tracing_subscriber::EnvFilter;

/// Stderr logging for test runs; `RUST_LOG` picks the level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn client(href: &str) -> (CrmClient<MemoryHistory>, MemoryHistory) {
    init_tracing();
    let history = MemoryHistory::new(href);
    let client = CrmClient::start(None, history.clone()).expect("start client");
    (client, history)
}

fn restricted_sales(client: &CrmClient<MemoryHistory>) -> SessionState {
    let doc: CrmUserDoc = serde_json::from_value(serde_json::json!({
        "name": "rep@example.com",
        "full_name": "Rep",
        "nirmaan_role_name": "Nirmaan Sales User Profile",
        "has_company": "false"
    }))
    .expect("decode crm user");
    SessionState::resolve(Some("rep@example.com"), Some(doc), &client.config)
}

#[test]
fn selecting_a_record_then_going_back_restores_the_list() {
    let (client, history) = client("/companies?innerTab=tasks");
    let id = client.url.synced("id", "");

    id.set("CMP-0001", &["innerTab"]);
    assert_eq!(
        client.route(),
        Route::Companies {
            selected: Some("CMP-0001".to_string())
        }
    );
    assert_eq!(client.url.get("innerTab"), None);

    assert!(history.back());
    client.url.sync_from_history();
    assert_eq!(id.value(), "");
    assert_eq!(client.url.get("innerTab").as_deref(), Some("tasks"));
}

#[test]
fn batch_update_is_one_history_entry() {
    let (client, history) = client("/");
    let values = client.url.synced_many(&[("a", ""), ("b", "")]);

    values.set(&[("a", Some("1")), ("b", Some("2"))], &[]);

    assert_eq!(history.len(), 2);
    assert!(
        history
            .location()
            .query
            .same_entries(&QueryParams::parse("a=1&b=2"))
    );
}

#[test]
fn legacy_string_company_flag_still_confines_sales() {
    let (client, history) = client("/team");
    let session = restricted_sales(&client);
    let ready = session.session().expect("ready session");
    assert!(!ready.has_company);

    assert_eq!(
        client.check_navigation(&session),
        GuardDecision::Redirect("/".to_string())
    );

    history.navigate("/boqs/abc");
    assert_eq!(client.check_navigation(&session), GuardDecision::Allow);
}

#[test]
fn guard_redirect_replaces_the_denied_entry() {
    let (client, history) = client("/");
    let session = restricted_sales(&client);
    history.navigate("/companies");
    assert_eq!(history.len(), 2);

    assert_eq!(
        client.enforce_navigation(&session),
        GuardDecision::Redirect("/".to_string())
    );
    assert_eq!(history.len(), 2);
    assert_eq!(history.location().pathname, "/");

    // Back reaches the entry before the denied one, not the denied path.
    assert!(history.back());
    assert_eq!(history.location().pathname, "/");
    assert_eq!(client.enforce_navigation(&session), GuardDecision::Allow);
}

#[test]
fn signing_out_sends_every_page_to_login() {
    let (client, history) = client("/boqs");
    assert_eq!(
        client.enforce_navigation(&restricted_sales(&client)),
        GuardDecision::Allow
    );

    assert_eq!(
        client.enforce_navigation(&SessionState::Anonymous),
        GuardDecision::Redirect("/login".to_string())
    );
    assert_eq!(history.location().pathname, "/login");
    assert_eq!(history.len(), 1);
    assert_eq!(
        client.enforce_navigation(&SessionState::Anonymous),
        GuardDecision::Allow
    );
}

#[test]
fn admin_task_creation_goes_through_profile_picker() {
    let (client, _history) = client("/tasks");

    let opened = create_task(&client.dialogs, &Role::Admin, NewTaskContext::default());
    assert_eq!(opened, Some(DialogId::SelectTaskProfile));
    assert!(!client.dialogs.is_open::<keys::NewTask>());

    client.dialogs.choose_task_profile(TaskProfile::Sales);
    assert_eq!(client.dialogs.open_keys(), vec![DialogId::NewTask]);
    assert_eq!(
        client.dialogs.get::<keys::NewTask>().context.task_profile,
        Some(TaskProfile::Sales)
    );
}

#[test]
fn fab_on_selected_contact_opens_linked_boq_form() {
    let (client, _history) = client("/contacts/contact?id=CON-9");
    let options = fab_options(&client.route(), &Role::Sales);
    let boq = options
        .iter()
        .find(|option| option.label == "Add New BOQ")
        .expect("boq option");

    boq.action.dispatch(&client.dialogs, &Role::Sales);

    let dialog = client.dialogs.get::<keys::NewBoq>();
    assert!(dialog.is_open);
    assert_eq!(dialog.context, ParentLink::contact("CON-9"));
}

#[test]
fn edit_flow_keeps_context_after_close() {
    let (client, _history) = client("/tasks/task?id=T-1");
    let task: TaskDoc = serde_json::from_value(serde_json::json!({
        "name": "T-1",
        "title": "Call back",
        "type": "Call",
        "task_profile": ""
    }))
    .expect("decode task");
    assert_eq!(task.task_profile, None);

    let opened = open_task_editor(&client.dialogs, task, TaskEditMode::Edit);
    assert_eq!(opened, DialogId::EditTask);

    client.dialogs.close_edit_task();
    let dialog = client.dialogs.get::<keys::EditTask>();
    assert!(!dialog.is_open);
    assert_eq!(dialog.context.task.map(|task| task.name).as_deref(), Some("T-1"));
}
