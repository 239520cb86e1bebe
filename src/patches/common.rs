//! Patches for `common.ts`.
//!
//! The generated request helper takes the base path per call. After patching it reads
//! the timeout and base URL from the `configuration` object handed down by the API
//! class, only accepts 2xx responses, and rejects whenever axios reports an error.

use super::{silence_lint_banner, FilePatcher, FileRole, Rule};
use crate::error::Result;

const AXIOS_IMPORT: &str = "import type { AxiosInstance, AxiosResponse } from 'axios';";
const WIDENED_AXIOS_IMPORT: &str = "import { type AxiosInstance, type AxiosResponse, type AxiosRequestConfig, isAxiosError } from 'axios';";

const REQUEST_ARGS_PATTERN: &str = r"(?m)const axiosRequestArgs.*;$";
const REQUEST_ARGS: &str = r#"
  const axiosRequestArgs: AxiosRequestConfig = {
    ...axiosArgs.options,
    url: axiosArgs.url,
    timeout: configuration?.defaultRequestTimeout,
    baseURL: configuration?.baseUrl,
    headers: {
      ...(axiosArgs.options.headers || {}),
    },
    validateStatus: (code) => code >= 200 && code < 300,
  };
  "#;

const REQUEST_CALL: &str = "return axios.request<T, R>(axiosRequestArgs);";
const REJECTING_REQUEST_CALL: &str = r#"
  return axios.request<T, R>(axiosRequestArgs).then((res) => {
    if (isAxiosError(res)) {
      throw res;
    }
    return res;
  });
  "#;

/// Rewrites the shared request helpers.
pub struct CommonPatcher;

impl FilePatcher for CommonPatcher {
    fn role(&self) -> FileRole {
        FileRole::Common
    }

    fn rules(&self) -> Result<Vec<Rule>> {
        Ok(vec![
            silence_lint_banner(),
            Rule::replace("axios import", AXIOS_IMPORT, WIDENED_AXIOS_IMPORT),
            Rule::replace("basePath argument", ", basePath: string = BASE_PATH", ""),
            Rule::replace("BASE_PATH parameter", "BASE_PATH: string, ", ""),
            Rule::pattern_all("request arguments", REQUEST_ARGS_PATTERN, REQUEST_ARGS)?,
            Rule::replace("reject axios errors", REQUEST_CALL, REJECTING_REQUEST_CALL),
        ])
    }
}
