#[cfg(test)]
mod support;

mod quiz_flow;
