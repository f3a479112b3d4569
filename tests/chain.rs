#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todoledger::api::local::DEV_ACCOUNTS;
    use todoledger::api::{Address, TxStatus};
    use todoledger::libs::chain::{LocalChain, LOCAL_CHAIN_ID};
    use todoledger::libs::ledger::LedgerCall;
    use todoledger::libs::todo::Todo;

    struct ChainTestContext {
        temp_dir: TempDir,
        sender: Address,
    }

    impl ChainTestContext {
        fn chain(&self) -> LocalChain {
            LocalChain::open_at(self.temp_dir.path().join("ledger.db"), LOCAL_CHAIN_ID).unwrap()
        }
    }

    impl TestContext for ChainTestContext {
        fn setup() -> Self {
            ChainTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                sender: Address::parse(DEV_ACCOUNTS[0]).unwrap(),
            }
        }
    }

    #[test_context(ChainTestContext)]
    #[test]
    fn test_execute_mines_one_block_per_transaction(ctx: &mut ChainTestContext) {
        let chain = ctx.chain();
        assert_eq!(chain.block_number(), 0);

        let first = chain.execute(&ctx.sender, &LedgerCall::AddTodo("a".into())).unwrap();
        let second = chain.execute(&ctx.sender, &LedgerCall::AddTodo("b".into())).unwrap();

        assert_eq!(first.block_number, 1);
        assert_eq!(second.block_number, 2);
        assert_ne!(first.tx_hash, second.tx_hash);
        assert!(first.is_success() && second.is_success());
        assert_eq!(chain.get_todos(), vec![Todo::new("a"), Todo::new("b")]);
    }

    #[test_context(ChainTestContext)]
    #[test]
    fn test_rejected_call_is_mined_as_reverted(ctx: &mut ChainTestContext) {
        let chain = ctx.chain();
        chain.execute(&ctx.sender, &LedgerCall::AddTodo("a".into())).unwrap();

        let receipt = chain.execute(&ctx.sender, &LedgerCall::DeleteTodo(5)).unwrap();
        match &receipt.status {
            TxStatus::Reverted(Some(reason)) => assert!(reason.contains("out of range")),
            other => panic!("expected revert, got {:?}", other),
        }
        assert_eq!(receipt.block_number, 2);
        assert_eq!(chain.get_todos(), vec![Todo::new("a")]);

        let blank = chain.execute(&ctx.sender, &LedgerCall::AddTodo("  ".into())).unwrap();
        assert!(!blank.is_success());
        assert_eq!(chain.get_todos().len(), 1);
    }

    #[test_context(ChainTestContext)]
    #[test]
    fn test_receipt_lookup(ctx: &mut ChainTestContext) {
        let chain = ctx.chain();
        let call = LedgerCall::AddTodo("buy milk".into());
        let mined = chain.execute(&ctx.sender, &call).unwrap();

        assert_eq!(chain.receipt(&mined.tx_hash).unwrap(), Some(mined.clone()));
        assert_eq!(chain.transaction_call(&mined.tx_hash).unwrap(), Some(call));

        let unknown = todoledger::api::TxHash::new("0x00");
        assert_eq!(chain.receipt(&unknown).unwrap(), None);
    }

    #[test_context(ChainTestContext)]
    #[test]
    fn test_state_survives_reopen(ctx: &mut ChainTestContext) {
        {
            let chain = ctx.chain();
            chain.execute(&ctx.sender, &LedgerCall::AddTodo("buy milk".into())).unwrap();
            chain.execute(&ctx.sender, &LedgerCall::AddTodo("walk dog".into())).unwrap();
            chain.execute(&ctx.sender, &LedgerCall::AddTodo("call mom".into())).unwrap();
            chain.execute(&ctx.sender, &LedgerCall::MarkAsCompleted(2)).unwrap();
            chain.execute(&ctx.sender, &LedgerCall::DeleteTodo(0)).unwrap();
        }

        let chain = ctx.chain();
        assert_eq!(chain.block_number(), 5);
        let todos = chain.get_todos();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0], Todo::new("walk dog"));
        assert_eq!(todos[1].content, "call mom");
        assert!(todos[1].completed);

        // Block numbering continues where it stopped.
        let next = chain.execute(&ctx.sender, &LedgerCall::MarkAsCompleted(0)).unwrap();
        assert_eq!(next.block_number, 6);
    }

    #[test]
    fn test_in_memory_chain() {
        let chain = LocalChain::in_memory(1337).unwrap();
        assert_eq!(chain.chain_id(), 1337);
        assert!(chain.get_todos().is_empty());
    }
}
