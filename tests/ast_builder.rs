//! Integration tests for the AST builder.

use nearlyc_parser::{build_ast, parse};
use nearlyc_syntax::{AstTag, GrammarSymbol, Node, NodeId, Tree};
use pretty_assertions::assert_eq;

fn ast_of(source: &str) -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let root = parse(&mut tree, source, "input.c").unwrap();
    let ast = build_ast(&mut tree, root);
    (tree, ast)
}

/// `TAG[text](kid, kid, ...)`
fn sexpr(tree: &Tree, id: NodeId) -> String {
    let node = &tree[id];
    let mut out = node.tag().name().to_string();
    if !node.text().is_empty() {
        out.push_str(&format!("[{}]", node.text()));
    }
    if node.num_kids() > 0 {
        let kids: Vec<String> = tree.children(id).map(|k| sexpr(tree, k)).collect();
        out.push_str(&format!("({})", kids.join(", ")));
    }
    out
}

fn first(tree: &Tree, root: NodeId, tag: AstTag) -> NodeId {
    tree.preorder(root)
        .find(|&id| tree[id].tag() == tag)
        .unwrap_or_else(|| panic!("no {} node", tag.name()))
}

#[test]
fn test_declarator_list_is_flattened_in_order() {
    let (tree, ast) = ast_of("int a, b, c;");
    assert_eq!(
        sexpr(&tree, ast),
        "AST_UNIT(AST_VARIABLE_DECLARATION(AST_BASIC_TYPE(TOK_INT[int]), \
         AST_DECLARATOR_LIST(AST_NAMED_DECLARATOR(TOK_IDENT[a]), \
         AST_NAMED_DECLARATOR(TOK_IDENT[b]), AST_NAMED_DECLARATOR(TOK_IDENT[c]))))"
    );
}

#[test]
fn test_flatten_hand_built_list() {
    // statement_list(a, statement_list(b, statement_list(c)))
    let mut tree = Tree::new();
    let stmts: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            let ident = tree.alloc(Node::with_text(GrammarSymbol::TokIdent, *name));
            let primary = tree.alloc_with_kids(GrammarSymbol::NodePrimaryExpression, [ident]);
            let semi = tree.alloc(Node::with_text(GrammarSymbol::TokSemicolon, ";"));
            tree.alloc_with_kids(GrammarSymbol::NodeStatement, [primary, semi])
        })
        .collect();
    let c = tree.alloc_with_kids(GrammarSymbol::NodeStatementList, [stmts[2]]);
    let b = tree.alloc_with_kids(GrammarSymbol::NodeStatementList, [stmts[1], c]);
    let a = tree.alloc_with_kids(GrammarSymbol::NodeStatementList, [stmts[0], b]);

    let list = build_ast(&mut tree, a);
    assert_eq!(
        sexpr(&tree, list),
        "AST_STATEMENT_LIST(AST_EXPRESSION_STATEMENT(AST_VARIABLE_REF(TOK_IDENT[a])), \
         AST_EXPRESSION_STATEMENT(AST_VARIABLE_REF(TOK_IDENT[b])), \
         AST_EXPRESSION_STATEMENT(AST_VARIABLE_REF(TOK_IDENT[c])))"
    );
}

#[test]
fn test_storage_class_is_hoisted() {
    let (tree, ast) = ast_of("int a;\nstatic int x;");
    let decl = tree.kid(ast, 1);
    assert_eq!(
        sexpr(&tree, decl),
        "AST_VARIABLE_DECLARATION(TOK_STATIC[static], AST_BASIC_TYPE(TOK_INT[int]), \
         AST_DECLARATOR_LIST(AST_NAMED_DECLARATOR(TOK_IDENT[x])))"
    );
    assert_eq!(tree[decl].loc().to_string(), "input.c:2:1");
}

#[test]
fn test_extern_function_declaration() {
    let (tree, ast) = ast_of("extern int f(int a, char b);");
    assert_eq!(
        sexpr(&tree, tree.kid(ast, 0)),
        "AST_FUNCTION_DECLARATION(TOK_EXTERN[extern], AST_BASIC_TYPE(TOK_INT[int]), \
         TOK_IDENT[f], AST_FUNCTION_PARAMETER_LIST(\
         AST_FUNCTION_PARAMETER(AST_BASIC_TYPE(TOK_INT[int]), AST_NAMED_DECLARATOR(TOK_IDENT[a])), \
         AST_FUNCTION_PARAMETER(AST_BASIC_TYPE(TOK_CHAR[char]), AST_NAMED_DECLARATOR(TOK_IDENT[b]))))"
    );
}

#[test]
fn test_type_branches() {
    let (tree, ast) = ast_of("struct S s; union U u; unsigned long n;");
    let types: Vec<String> = tree
        .children(ast)
        .map(|decl| sexpr(&tree, tree.kid(decl, 0)))
        .collect();
    assert_eq!(
        types,
        vec![
            "AST_STRUCT_TYPE(TOK_IDENT[S])",
            "AST_UNION_TYPE(TOK_IDENT[U])",
            "AST_BASIC_TYPE(TOK_UNSIGNED[unsigned], TOK_LONG[long])",
        ]
    );
}

#[test]
#[should_panic(expected = "unsupported declarator")]
fn test_pointer_declarator_is_unsupported() {
    ast_of("int *p;");
}

#[test]
fn test_union_definition() {
    let (tree, ast) = ast_of("union V { int i; float f; };");
    let def = tree.kid(ast, 0);
    assert_eq!(tree[def].tag(), AstTag::UnionTypeDefinition);
    let fields = tree.kid(def, 1);
    assert_eq!(tree[fields].tag(), AstTag::FieldDefinitionList);
    assert_eq!(tree[fields].num_kids(), 2);
}

#[test]
fn test_empty_lists() {
    let (tree, ast) = ast_of("void f() { }\nstruct E { };");
    assert_eq!(
        sexpr(&tree, tree.kid(ast, 0)),
        "AST_FUNCTION_DEFINITION(AST_BASIC_TYPE(TOK_VOID[void]), TOK_IDENT[f], \
         AST_FUNCTION_PARAMETER_LIST, AST_STATEMENT_LIST)"
    );
    assert_eq!(
        sexpr(&tree, tree.kid(ast, 1)),
        "AST_STRUCT_TYPE_DEFINITION(TOK_IDENT[E], AST_FIELD_DEFINITION_LIST)"
    );
}

#[test]
fn test_expression_precedence() {
    let (tree, ast) = ast_of("int f() { a = b + c * (d - 1); }");
    let stmt = first(&tree, ast, AstTag::ExpressionStatement);
    assert_eq!(
        sexpr(&tree, stmt),
        "AST_EXPRESSION_STATEMENT(AST_BINARY_EXPRESSION(TOK_ASSIGN[=], \
         AST_VARIABLE_REF(TOK_IDENT[a]), AST_BINARY_EXPRESSION(TOK_PLUS[+], \
         AST_VARIABLE_REF(TOK_IDENT[b]), AST_BINARY_EXPRESSION(TOK_ASTERISK[*], \
         AST_VARIABLE_REF(TOK_IDENT[c]), AST_BINARY_EXPRESSION(TOK_MINUS[-], \
         AST_VARIABLE_REF(TOK_IDENT[d]), AST_LITERAL_VALUE(TOK_INT_LIT[1]))))))"
    );
}

#[test]
fn test_assignment_is_right_associative() {
    let (tree, ast) = ast_of("int f() { a = b = c; }");
    let outer = first(&tree, ast, AstTag::BinaryExpression);
    let rhs = tree.kid(outer, 2);
    assert_eq!(tree[rhs].tag(), AstTag::BinaryExpression);
    assert_eq!(tree[tree.kid(outer, 1)].tag(), AstTag::VariableRef);
}

#[test]
fn test_postfix_and_unary() {
    let (tree, ast) = ast_of("int f() { return -g(p->x, s.y, a[2], 'c'); }");
    let ret = first(&tree, ast, AstTag::ReturnExpressionStatement);
    assert_eq!(
        sexpr(&tree, ret),
        "AST_RETURN_EXPRESSION_STATEMENT(AST_UNARY_EXPRESSION(TOK_MINUS[-], \
         AST_FUNCTION_CALL_EXPRESSION(AST_VARIABLE_REF(TOK_IDENT[g]), \
         AST_ARGUMENT_EXPRESSION_LIST(\
         AST_INDIRECT_FIELD_REF_EXPRESSION(AST_VARIABLE_REF(TOK_IDENT[p]), TOK_IDENT[x]), \
         AST_FIELD_REF_EXPRESSION(AST_VARIABLE_REF(TOK_IDENT[s]), TOK_IDENT[y]), \
         AST_ARRAY_ELEMENT_REF_EXPRESSION(AST_VARIABLE_REF(TOK_IDENT[a]), \
         AST_LITERAL_VALUE(TOK_INT_LIT[2])), \
         AST_LITERAL_VALUE(TOK_CHAR_LIT['c'])))))"
    );
}

#[test]
fn test_statement_kinds_and_keyword_locations() {
    let source = "void f() {
  while (x) x = x - 1;
  do ; while (y);
  for (i = 0; i < 3; i = i + 1) ;
  if (a) return; else ;
  if (b) { }
}";
    let (tree, ast) = ast_of(source);
    let body = first(&tree, ast, AstTag::StatementList);
    let stmts: Vec<(String, String)> = tree
        .children(body)
        .map(|s| (tree[s].tag().name().to_string(), tree[s].loc().to_string()))
        .collect();
    assert_eq!(
        stmts,
        vec![
            ("AST_WHILE_STATEMENT".to_string(), "input.c:2:3".to_string()),
            ("AST_DO_WHILE_STATEMENT".to_string(), "input.c:3:3".to_string()),
            ("AST_FOR_STATEMENT".to_string(), "input.c:4:3".to_string()),
            ("AST_IF_ELSE_STATEMENT".to_string(), "input.c:5:3".to_string()),
            ("AST_IF_STATEMENT".to_string(), "input.c:6:3".to_string()),
        ]
    );
    let if_else = tree.kid(body, 3);
    assert_eq!(tree[tree.kid(if_else, 1)].tag(), AstTag::ReturnStatement);
    assert_eq!(tree[tree.kid(if_else, 2)].tag(), AstTag::EmptyStatement);
}

#[test]
fn test_tokens_are_shared_with_the_parse_tree() {
    let mut tree = Tree::new();
    let root = parse(&mut tree, "int x;", "input.c").unwrap();
    let ident = tree
        .preorder(root)
        .find(|&id| tree[id].tag() == GrammarSymbol::TokIdent)
        .unwrap();
    let before = tree.len();
    let ast = build_ast(&mut tree, root);
    assert!(tree.preorder(ast).any(|id| id == ident));
    // unit, declaration, basic type, declarator list, named declarator
    assert_eq!(tree.len() - before, 5);
    // Only nonterminals and punctuation are left behind.
    let detached = tree.detached_from(ast);
    let tokens: Vec<&str> = detached
        .iter()
        .filter(|&&id| tree[id].tag().is_token())
        .map(|&id| tree[id].text())
        .collect();
    assert_eq!(tokens, vec![";"]);
    assert!(detached.iter().all(|&id| !tree[id].tag().is_ast()));
}

#[test]
fn test_ast_node_passes_through_unchanged() {
    let mut tree = Tree::new();
    let lit = tree.alloc(Node::with_text(GrammarSymbol::TokIntLit, "1"));
    let ast = tree.alloc_with_kids(AstTag::LiteralValue, [lit]);
    assert_eq!(build_ast(&mut tree, ast), ast);
    assert_eq!(build_ast(&mut tree, lit), lit);
}
