//! 32-bit x86 for the flat assembler.
//!
//! Every expression node owns one `{expression}` slot and leaves its value in
//! `eax`. Binary operators keep the left operand on the stack while the right
//! one is computed.

use parsegen::{AstNode, Grammar, REPETITION};

use super::{fill_all, fill_first, Generator};
use crate::grammar::{
    ADDITIVE, EXPRESSION, FACTOR, FUNCTION, MULTIPLICATIVE, PROGRAM, STATEMENT, TERM, UNARY,
};
use crate::lexer::Category;

pub const FUNCTION_NAME: &str = "{function_name}";
/// Prefix of function labels, keeping them apart from the template's labels.
pub const FUNCTION_LABEL_PREFIX: &str = "fn_";
pub const FUNCTION_BODY: &str = "{function_body}";
pub const EXPRESSION_SLOT: &str = "{expression}";

/// Separates instructions inside the function body.
const NEXT: &str = "\n        ";

const PROGRAM_TEMPLATE: &str = "format PE console
entry start

section '.text' code readable executable

start:
        call {function_name}
        push eax
        call [ExitProcess]

{function_name}:
        {function_body}

section '.idata' import data readable writeable

        dd 0,0,0,RVA kernel_name,RVA kernel_table
        dd 0,0,0,0,0

kernel_table:
        ExitProcess dd RVA _ExitProcess
        dd 0

kernel_name db 'KERNEL32.DLL',0

_ExitProcess dw 0
        db 'ExitProcess',0

section '.reloc' fixups data readable discardable
";

/// A generator with every Naja node kind registered.
pub fn generator(grammar: &Grammar) -> Generator<'_> {
    let mut gen = Generator::new(grammar);
    gen.register(PROGRAM, program)
        .register(FUNCTION, function)
        .register(STATEMENT, statement)
        .register(EXPRESSION, binary)
        .register(TERM, binary)
        .register(REPETITION, repetition)
        .register(FACTOR, factor)
        .register(UNARY, unary);
    gen
}

fn program(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    out.push_str(PROGRAM_TEMPLATE);
    gen.apply_to_children(node, out, 0);
}

fn function(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    let name = match node.child(Category::Identifier.name()) {
        Some(id) => id.text(),
        None => panic!("function without a name: {}", node),
    };
    fill_all(out, FUNCTION_NAME, &format!("{}{}", FUNCTION_LABEL_PREFIX, name));
    gen.apply_to_children(node, out, 0);
}

fn statement(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    if node.has_child(Category::Return.name()) {
        fill_all(out, FUNCTION_BODY, &format!("{}{}ret", EXPRESSION_SLOT, NEXT));
    }
    gen.apply_to_children(node, out, 0);
}

/// `operand { operator operand }`, evaluated left to right.
fn binary(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    let mut code = EXPRESSION_SLOT.to_owned();
    if let Some(rep) = node.child(REPETITION) {
        // Operands fill their own slots.
        let operators = rep
            .children()
            .iter()
            .filter(|c| c.kind() == ADDITIVE || c.kind() == MULTIPLICATIVE);
        for op in operators {
            let apply = match operator(op) {
                Category::Plus => "add eax, ecx".to_owned(),
                Category::Minus => "sub eax, ecx".to_owned(),
                Category::Multiply => "imul eax, ecx".to_owned(),
                Category::Divide => format!("cdq{}idiv ecx", NEXT),
                other => panic!("`{}` is not a binary operator", other.name()),
            };
            code.push_str(&format!(
                "{n}push eax{n}{slot}{n}mov ecx, eax{n}pop eax{n}{apply}",
                n = NEXT,
                slot = EXPRESSION_SLOT,
                apply = apply,
            ));
        }
    }
    fill_first(out, EXPRESSION_SLOT, &code);
    gen.apply_to_children(node, out, 0);
}

fn repetition(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    gen.apply_to_children(node, out, 0);
}

fn factor(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    match node.child(Category::IntLiteral.name()) {
        Some(literal) => fill_first(out, EXPRESSION_SLOT, &format!("mov eax, {}", literal.text())),
        None => gen.apply_to_children(node, out, 0),
    }
}

/// `operator factor`: the operand is computed first, then the operator applied
/// to `eax`.
fn unary(gen: &Generator<'_>, node: &AstNode, out: &mut String) {
    let apply = match operator(node) {
        Category::Minus => "neg eax".to_owned(),
        Category::BitwiseComplement => "not eax".to_owned(),
        Category::Not => format!("cmp eax, 0{n}mov eax, 0{n}sete al", n = NEXT),
        other => panic!("`{}` is not a unary operator", other.name()),
    };
    fill_first(out, EXPRESSION_SLOT, &format!("{}{}{}", EXPRESSION_SLOT, NEXT, apply));
    gen.apply_to_children(node, out, 1);
}

/// The category of an operator node's leading leaf.
fn operator(node: &AstNode) -> Category {
    let kind = match node.children().first() {
        Some(leaf) => leaf.kind(),
        None => panic!("operator node without children: {}", node),
    };
    match Category::from_name(kind) {
        Some(category) => category,
        None => panic!("unknown operator `{}`", kind),
    }
}
