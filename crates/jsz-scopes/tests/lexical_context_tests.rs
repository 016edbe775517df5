use jsz_scopes::{LexicalContext, LexicalContextNode, LexicalNodeKind, ScopeId};

/// Stand-in for a syntax tree node handle: real callers stack arena indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    id: u32,
    kind: LexicalNodeKind,
    scope: Option<ScopeId>,
}

impl Node {
    fn new(id: u32, kind: LexicalNodeKind) -> Self {
        Node { id, kind, scope: None }
    }

    fn with_scope(id: u32, kind: LexicalNodeKind, scope: u32) -> Self {
        Node { id, kind, scope: Some(ScopeId(scope)) }
    }
}

impl LexicalContextNode for Node {
    fn kind(&self) -> LexicalNodeKind {
        self.kind
    }

    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }
}

#[test]
fn test_push_pop_balance() {
    let mut ctx = LexicalContext::new();
    assert!(ctx.is_empty());

    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::new(2, LexicalNodeKind::Block);
    ctx.push(function);
    ctx.push(block);
    assert_eq!(ctx.len(), 2);
    assert_eq!(ctx.peek(), Some(&block));

    assert_eq!(ctx.pop(block), block);
    assert_eq!(ctx.pop(function), function);
    assert!(ctx.is_empty());
}

#[test]
#[should_panic(expected = "unbalanced lexical context")]
fn test_pop_mismatch_panics() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::new(2, LexicalNodeKind::Block);
    ctx.push(function);
    ctx.push(block);
    ctx.pop(function);
}

#[test]
fn test_contains() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::new(2, LexicalNodeKind::Block);
    ctx.push(function);
    assert!(ctx.contains(function));
    assert!(!ctx.contains(block));
}

#[test]
fn test_replace_at_top() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::with_scope(2, LexicalNodeKind::Block, 7);
    ctx.push(function);
    ctx.push(block);

    // a structurally updated copy replaces the node wholesale
    let rewritten = Node::with_scope(3, LexicalNodeKind::Block, 7);
    assert_eq!(ctx.replace(block, rewritten), rewritten);
    assert_eq!(ctx.peek(), Some(&rewritten));
    assert!(!ctx.contains(block));

    // the stack stays balanced against the new node
    assert_eq!(ctx.pop(rewritten), rewritten);
    assert_eq!(ctx.pop(function), function);
}

#[test]
#[should_panic(expected = "top of the lexical context stack")]
fn test_replace_below_top_panics() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::new(2, LexicalNodeKind::Block);
    ctx.push(function);
    ctx.push(block);
    ctx.replace(function, Node::new(3, LexicalNodeKind::Function));
}

#[test]
fn test_nearest_enclosing_queries() {
    let mut ctx = LexicalContext::new();
    let outer_fn = Node::with_scope(1, LexicalNodeKind::Function, 0);
    let outer_block = Node::with_scope(2, LexicalNodeKind::Block, 1);
    let class = Node::with_scope(3, LexicalNodeKind::Class, 2);
    let method = Node::with_scope(4, LexicalNodeKind::Function, 3);
    let body = Node::with_scope(5, LexicalNodeKind::Block, 4);
    for node in [outer_fn, outer_block, class, method, body] {
        ctx.push(node);
    }

    assert_eq!(ctx.current_block(), Some(body));
    assert_eq!(ctx.current_function(), Some(method));
    assert_eq!(ctx.current_class(), Some(class));
    assert_eq!(ctx.current_scope(), Some(ScopeId(4)));

    let blocks: Vec<Node> = ctx.blocks().collect();
    assert_eq!(blocks, [body, outer_block]);
    let functions: Vec<Node> = ctx.functions().collect();
    assert_eq!(functions, [method, outer_fn]);
}

#[test]
fn test_current_non_arrow_function_skips_arrows() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let arrow = Node::new(2, LexicalNodeKind::ArrowFunction);
    let inner_arrow = Node::new(3, LexicalNodeKind::ArrowFunction);
    ctx.push(function);
    ctx.push(arrow);
    ctx.push(inner_arrow);

    // arrows count as functions, but this/super/new.target belong further out
    assert_eq!(ctx.current_function(), Some(inner_arrow));
    assert_eq!(ctx.current_non_arrow_function(), Some(function));
}

#[test]
fn test_current_scope_skips_scopeless_nodes() {
    let mut ctx = LexicalContext::new();
    let function = Node::with_scope(1, LexicalNodeKind::Function, 0);
    let label = Node::new(2, LexicalNodeKind::Other);
    ctx.push(function);
    ctx.push(label);
    assert_eq!(ctx.current_scope(), Some(ScopeId(0)));
}

#[test]
fn test_empty_queries() {
    let ctx: LexicalContext<Node> = LexicalContext::new();
    assert_eq!(ctx.current_block(), None);
    assert_eq!(ctx.current_function(), None);
    assert_eq!(ctx.current_non_arrow_function(), None);
    assert_eq!(ctx.current_class(), None);
    assert_eq!(ctx.current_scope(), None);
    assert_eq!(ctx.peek(), None);
}

#[test]
fn test_clone_snapshots_for_backtracking() {
    let mut ctx = LexicalContext::new();
    let function = Node::new(1, LexicalNodeKind::Function);
    let block = Node::new(2, LexicalNodeKind::Block);
    ctx.push(function);

    let snapshot = ctx.clone();
    ctx.push(block);
    ctx.pop(block);
    ctx.pop(function);

    // the snapshot is unaffected by later traversal
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.peek(), Some(&function));
    assert!(ctx.is_empty());
}

#[test]
fn test_iteration_is_innermost_first() {
    let mut ctx = LexicalContext::new();
    let a = Node::new(1, LexicalNodeKind::Function);
    let b = Node::new(2, LexicalNodeKind::Block);
    let c = Node::new(3, LexicalNodeKind::Block);
    ctx.push(a);
    ctx.push(b);
    ctx.push(c);
    let all: Vec<Node> = ctx.iter().collect();
    assert_eq!(all, [c, b, a]);
}
