// WMC: weighted methods per type.
// Sums the cyclomatic complexity of every method belonging to the type.

use crate::domain::record::TypeRecord;
use crate::domain::unit::CompilationUnit;
use crate::ports::TypeLevelMetric;
use syn::visit::{self, Visit};
use syn::{BinOp, Block};

pub struct ComplexityMetric {
    total: u32,
}

impl ComplexityMetric {
    pub fn new() -> Self {
        Self { total: 0 }
    }
}

/// Cyclomatic complexity of one body: 1 plus the number of branch points
/// (`if`, `match` arms beyond the first, loops, lazy `&&`/`||`, `?`).
pub fn cyclomatic(block: &Block) -> u32 {
    let mut counter = BranchCounter { branches: 0 };
    counter.visit_block(block);
    1 + counter.branches
}

struct BranchCounter {
    branches: u32,
}

impl<'ast> Visit<'ast> for BranchCounter {
    fn visit_expr_if(&mut self, node: &'ast syn::ExprIf) {
        self.branches += 1;
        visit::visit_expr_if(self, node);
    }

    fn visit_expr_match(&mut self, node: &'ast syn::ExprMatch) {
        self.branches += node.arms.len().saturating_sub(1) as u32;
        visit::visit_expr_match(self, node);
    }

    fn visit_expr_while(&mut self, node: &'ast syn::ExprWhile) {
        self.branches += 1;
        visit::visit_expr_while(self, node);
    }

    fn visit_expr_for_loop(&mut self, node: &'ast syn::ExprForLoop) {
        self.branches += 1;
        visit::visit_expr_for_loop(self, node);
    }

    fn visit_expr_loop(&mut self, node: &'ast syn::ExprLoop) {
        self.branches += 1;
        visit::visit_expr_loop(self, node);
    }

    fn visit_expr_binary(&mut self, node: &'ast syn::ExprBinary) {
        if matches!(node.op, BinOp::And(_) | BinOp::Or(_)) {
            self.branches += 1;
        }
        visit::visit_expr_binary(self, node);
    }

    fn visit_expr_try(&mut self, node: &'ast syn::ExprTry) {
        self.branches += 1;
        visit::visit_expr_try(self, node);
    }
}

impl TypeLevelMetric for ComplexityMetric {
    fn execute(&mut self, unit: &CompilationUnit, result: &mut TypeRecord) {
        let items = unit.items_for(&result.type_name);
        for method in items.methods() {
            self.total += match method.block {
                Some(block) => cyclomatic(block),
                // Body-less trait method: a single straight-line path.
                None => 1,
            };
        }
    }

    fn set_result(&mut self, result: &mut TypeRecord) {
        result.wmc = self.total;
    }
}
