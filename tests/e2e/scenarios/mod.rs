mod contract_drift;
mod fail_fast;
mod failure_propagation;
mod full_run;
