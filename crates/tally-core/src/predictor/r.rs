//! R predictor adapter.
//!
//! Loads `.rds` artifacts through an embedded `Rscript` worker. R models
//! do not reliably embed class labels, so the label origin is the dataset;
//! the worker reports the levels it can observe after loading, when any.
//! User hooks in `custom.R` are sourced inside the worker.

use std::process::Command;
use std::sync::Arc;

use crate::predictor::foreign::ForeignPredictor;
use crate::predictor::{LabelOrigin, PredictorFactory};

const RUNTIME_NAME: &str = "R";

/// Serves both loading paths: a `.rds` artifact, or `custom.R` alone when
/// it defines `load_model`.
pub fn factory() -> PredictorFactory {
    Arc::new(|ctx| {
        let mut command = Command::new("Rscript");
        command.arg("-e").arg(WORKER_SOURCE);
        let predictor =
            ForeignPredictor::load(RUNTIME_NAME, &mut command, LabelOrigin::Dataset, ctx)?;
        Ok(Box::new(predictor))
    })
}

const WORKER_SOURCE: &str = r#"
suppressMessages(library(jsonlite))

model <- NULL
hooks <- new.env()

respond <- function(obj) {
  cat(toJSON(obj, auto_unbox = TRUE, null = "null"), "\n", sep = "")
  flush(stdout())
}

load_hooks <- function(code_dir) {
  for (name in c("custom.R", "custom.r")) {
    path <- file.path(code_dir, name)
    if (file.exists(path)) {
      sys.source(path, envir = hooks)
      break
    }
  }
}

handle_load <- function(req) {
  load_hooks(req$code_dir)
  if (exists("load_model", envir = hooks)) {
    model <<- get("load_model", envir = hooks)(req$code_dir)
  } else if (nzchar(req$artifact)) {
    model <<- readRDS(req$artifact)
  } else {
    respond(list(
      ok = FALSE,
      missing_load_model = TRUE,
      error = "custom.R does not define a load_model hook"
    ))
    return(invisible(NULL))
  }
  labels <- NULL
  if (!is.null(model$lev)) labels <- as.character(model$lev)
  respond(list(ok = TRUE, class_labels = labels))
}

handle_predict <- function(req) {
  frame <- as.data.frame(do.call(rbind, req$rows), stringsAsFactors = FALSE)
  names(frame) <- req$header
  frame[] <- lapply(frame, function(col) {
    converted <- suppressWarnings(as.numeric(col))
    if (all(!is.na(converted))) converted else col
  })
  if (exists("transform", envir = hooks)) {
    frame <- get("transform", envir = hooks)(frame)
  }
  if (exists("score", envir = hooks)) {
    out <- get("score", envir = hooks)(frame, model)
  } else if (!is.null(model$lev)) {
    out <- predict(model, newdata = frame, type = "prob")
  } else {
    out <- predict(model, newdata = frame)
  }
  if (exists("post_process", envir = hooks)) {
    out <- get("post_process", envir = hooks)(out)
  }
  if (is.data.frame(out) || is.matrix(out)) {
    respond(list(
      ok = TRUE,
      class_labels = colnames(out),
      probabilities = unname(apply(out, 1, as.numeric, simplify = FALSE))
    ))
  } else {
    respond(list(ok = TRUE, predictions = as.numeric(out)))
  }
}

cat("ready\n")
flush(stdout())
con <- file("stdin", open = "r")
while (length(line <- readLines(con, n = 1)) > 0) {
  req <- fromJSON(line, simplifyVector = FALSE)
  result <- tryCatch({
    if (req$op == "load") handle_load(req)
    else if (req$op == "predict") handle_predict(req)
    else respond(list(ok = FALSE, error = paste("unknown op:", req$op)))
  }, error = function(e) respond(list(ok = FALSE, error = conditionMessage(e))))
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_source_handshakes_and_covers_all_hooks() {
        assert!(WORKER_SOURCE.contains("ready"));
        for hook in ["load_model", "transform", "score", "post_process"] {
            assert!(WORKER_SOURCE.contains(hook), "worker must know {hook}");
        }
    }
}
