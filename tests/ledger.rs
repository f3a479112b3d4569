#[cfg(test)]
mod tests {
    use todoledger::libs::ledger::{is_blank, LedgerCall, LedgerError, TodoList};
    use todoledger::libs::todo::Todo;

    fn list(contents: &[&str]) -> TodoList {
        let mut list = TodoList::default();
        for content in contents {
            list.add_todo(content).unwrap();
        }
        list
    }

    fn contents(list: &TodoList) -> Vec<String> {
        list.get_todos().into_iter().map(|t| t.content).collect()
    }

    #[test]
    fn test_empty_ledger() {
        let list = TodoList::default();
        assert!(list.is_empty());
        assert_eq!(list.get_todos(), Vec::<Todo>::new());
    }

    #[test]
    fn test_add_appends_incomplete_task() {
        let mut list = list(&["buy milk"]);
        list.add_todo("walk dog").unwrap();

        assert_eq!(
            list.get_todos(),
            vec![Todo::new("buy milk"), Todo::new("walk dog")]
        );
        assert!(list.get_todos().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_add_keeps_content_verbatim() {
        let mut list = TodoList::default();
        list.add_todo("  padded  ").unwrap();
        list.add_todo("ünïcødé ✓").unwrap();

        assert_eq!(contents(&list), vec!["  padded  ", "ünïcødé ✓"]);
    }

    #[test]
    fn test_add_rejects_blank_content() {
        let mut list = list(&["a"]);

        assert_eq!(list.add_todo(""), Err(LedgerError::InvalidInput));
        assert_eq!(list.add_todo("   \t\n"), Err(LedgerError::InvalidInput));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_mark_as_completed() {
        let mut list = list(&["a", "b"]);
        list.mark_as_completed(1).unwrap();

        let todos = list.get_todos();
        assert!(!todos[0].completed);
        assert!(todos[1].completed);
        assert_eq!(todos[1].content, "b");
    }

    #[test]
    fn test_mark_as_completed_is_idempotent() {
        let mut list = list(&["a"]);
        list.mark_as_completed(0).unwrap();
        let once = list.clone();
        list.mark_as_completed(0).unwrap();

        assert_eq!(list, once);
    }

    #[test]
    fn test_mark_as_completed_out_of_range() {
        let mut list = list(&["a", "b"]);
        let before = list.clone();

        assert_eq!(
            list.mark_as_completed(2),
            Err(LedgerError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(list, before);
    }

    #[test]
    fn test_delete_shifts_successors() {
        let mut list = list(&["a", "b", "c"]);
        list.mark_as_completed(2).unwrap();
        list.delete_todo(0).unwrap();

        let todos = list.get_todos();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0], Todo::new("b"));
        assert_eq!(todos[1].content, "c");
        assert!(todos[1].completed);
    }

    #[test]
    fn test_delete_last_and_only() {
        let mut list = list(&["only"]);
        list.delete_todo(0).unwrap();

        assert!(list.is_empty());
        assert_eq!(
            list.delete_todo(0),
            Err(LedgerError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_index_boundary() {
        let mut list = list(&["a", "b", "c"]);

        assert!(list.delete_todo(3).is_err());
        assert!(list.delete_todo(u64::MAX).is_err());
        assert!(list.delete_todo(2).is_ok());
        assert_eq!(contents(&list), vec!["a", "b"]);
    }

    #[test]
    fn test_complete_then_delete_scenario() {
        let mut list = TodoList::default();
        list.add_todo("buy milk").unwrap();
        list.add_todo("walk dog").unwrap();
        list.mark_as_completed(0).unwrap();
        list.delete_todo(0).unwrap();

        assert_eq!(list.get_todos(), vec![Todo::new("walk dog")]);
    }

    #[test]
    fn test_apply_and_check() {
        let mut list = list(&["a"]);

        assert!(list.check(&LedgerCall::DeleteTodo(0)).is_ok());
        assert_eq!(
            list.check(&LedgerCall::MarkAsCompleted(1)),
            Err(LedgerError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            list.check(&LedgerCall::AddTodo(" ".into())),
            Err(LedgerError::InvalidInput)
        );

        list.apply(&LedgerCall::AddTodo("b".into())).unwrap();
        list.apply(&LedgerCall::MarkAsCompleted(1)).unwrap();
        list.apply(&LedgerCall::DeleteTodo(0)).unwrap();

        let todos = list.get_todos();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "b");
        assert!(todos[0].completed);
    }

    #[test]
    fn test_call_metadata() {
        let add = LedgerCall::AddTodo("x".into());
        assert_eq!(add.signature(), "addTodo(string)");
        assert_eq!(add.method(), "addTodo");
        assert_eq!(add.index(), None);
        assert_eq!(add.to_string(), "addTodo(\"x\")");

        let delete = LedgerCall::DeleteTodo(4);
        assert_eq!(delete.signature(), "deleteTodo(uint256)");
        assert_eq!(delete.index(), Some(4));
        assert_eq!(LedgerCall::MarkAsCompleted(1).to_string(), "markAsCompleted(1)");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \u{3000}\t"));
        assert!(!is_blank(" x "));
    }
}
