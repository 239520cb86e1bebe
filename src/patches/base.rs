//! Patches for `base.ts`.
//!
//! The generated `BaseAPI` is replaced by one built around a `ClientRuntime`: an object
//! holding the default timeout, base URL, bearer token and three ordered hook lists.
//! Every `BaseAPI` receives a runtime through its constructor (the shared instance by
//! default), so whoever composes the client decides which hooks run. Hooks run in
//! registration order:
//!
//! - `onRequest` is folded over the outgoing request, each hook feeding the next
//! - `onResponseFulfilled` is folded over successful responses
//! - every `onResponseRejected` hook sees a failure, which is then passed on

use super::{silence_lint_banner, FilePatcher, FileRole, Rule};
use crate::error::Result;

const AXIOS_IMPORT: &str =
    "import type { AxiosPromise, AxiosInstance, AxiosRequestConfig } from 'axios';";
const WIDENED_AXIOS_IMPORT: &str = "import type { AxiosPromise, AxiosInstance, AxiosRequestConfig, InternalAxiosRequestConfig, AxiosResponse } from 'axios';";

const BASE_CLIENT_PATTERN: &str = r"export class BaseAPI \{[\s\S]*\};";
const BASE_CLIENT: &str = r#"export class ClientRuntime {
    public static readonly shared = new ClientRuntime();

    public defaultRequestTimeout?: number;
    public baseUrl?: string;
    public accessToken?: string;
    public readonly onRequest: Array<(request: InternalAxiosRequestConfig) => InternalAxiosRequestConfig<unknown>> = [];
    public readonly onResponseFulfilled: Array<(response: AxiosResponse) => AxiosResponse> = [];
    public readonly onResponseRejected: Array<(error: unknown) => void> = [];

    public get configuration(): Configuration {
      return new Configuration({
        baseUrl: this.baseUrl,
        defaultRequestTimeout: this.defaultRequestTimeout,
        accessToken: this.accessToken,
      });
    }
}

export class BaseAPI {
    protected readonly runtime: ClientRuntime;
    protected axios: AxiosInstance;

    public constructor(runtime: ClientRuntime = ClientRuntime.shared) {
      this.runtime = runtime;
      this.axios = globalAxios.create();
      this.axios.interceptors.request.use(request => {
        return this.runtime.onRequest.reduce((prev, curr) => {
          return curr(prev);
        }, request);
      });
      this.axios.interceptors.response.use(response => {
        return this.runtime.onResponseFulfilled.reduce((prev, curr) => {
          return curr(prev);
        }, response);
      }, (err: unknown) => {
        this.runtime.onResponseRejected.forEach(cb => cb(err));
        return err;
      });
    }

    protected get configuration(): Configuration {
      return this.runtime.configuration;
    }
};
"#;

/// Replaces the base client with a runtime-driven one.
pub struct BasePatcher;

impl FilePatcher for BasePatcher {
    fn role(&self) -> FileRole {
        FileRole::Base
    }

    fn rules(&self) -> Result<Vec<Rule>> {
        Ok(vec![
            silence_lint_banner(),
            Rule::pattern("empty base path", r"export const BASE_PATH.*", r#"export const BASE_PATH = "";"#)?,
            Rule::replace(
                "configuration value import",
                "import type { Configuration }",
                "import { Configuration }",
            ),
            Rule::replace("axios import", AXIOS_IMPORT, WIDENED_AXIOS_IMPORT),
            Rule::pattern_all("base client", BASE_CLIENT_PATTERN, BASE_CLIENT)?,
        ])
    }
}
