use exercise_core::{Workspace, WorkspaceError};

#[test]
fn test_workspace_open_lookup_close() {
    let mut ws = Workspace::new();
    assert!(ws.is_empty());

    let answer = ws
        .open_buffer(Some("exercise://answer".to_string()), "int x = 5;")
        .unwrap();
    let scratch = ws.open_buffer(None, "").unwrap();
    assert_eq!(ws.len(), 2);
    assert_eq!(ws.buffer_ids(), vec![answer, scratch]);
    assert_eq!(ws.buffer_id_for_uri("exercise://answer"), Some(answer));
    assert_eq!(ws.buffer(answer).unwrap().text(), "int x = 5;");
    assert_eq!(
        ws.buffer_metadata(answer).and_then(|m| m.uri.as_deref()),
        Some("exercise://answer")
    );

    ws.buffer_mut(scratch).unwrap().insert(0, "x").unwrap();
    assert_eq!(ws.buffer(scratch).unwrap().text(), "x");

    ws.close_buffer(answer).unwrap();
    assert_eq!(ws.len(), 1);
    assert_eq!(ws.buffer_id_for_uri("exercise://answer"), None);
    assert_eq!(
        ws.buffer(answer).unwrap_err(),
        WorkspaceError::BufferNotFound(answer)
    );
    assert_eq!(
        ws.close_buffer(answer),
        Err(WorkspaceError::BufferNotFound(answer))
    );
}

#[test]
fn test_workspace_rejects_duplicate_uri() {
    let mut ws = Workspace::new();
    ws.open_buffer(Some("exercise://answer".to_string()), "a")
        .unwrap();

    let err = ws
        .open_buffer(Some("exercise://answer".to_string()), "b")
        .unwrap_err();
    assert_eq!(
        err,
        WorkspaceError::UriAlreadyOpen("exercise://answer".to_string())
    );
    assert_eq!(ws.len(), 1);
}
