use std::fmt;

/// A parameter.
///
/// This struct represents a parameter in a SIP message,
/// consisting of a name and an optional value.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Param {
    /// The parameter name.
    pub name: String,

    /// The parameter optional value
    pub value: Option<String>,
}

impl Param {
    /// Creates a `Param` from a name and an optional value.
    pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Into::into),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        Ok(())
    }
}

/// A collection of SIP parameters.
///
/// The parameters keep their insertion order and names are
/// compared ignoring ASCII case.
///
/// # Examples
///
/// ```
/// use siphdr::message::Params;
///
/// let mut params = Params::new();
/// params.set("realm", Some("atlanta.com"));
/// params.set("stale", None::<&str>);
///
/// assert_eq!(params.get("REALM"), Some(Some("atlanta.com")));
/// assert_eq!(params.get("stale"), Some(None));
/// assert_eq!(params.to_string(), ";realm=atlanta.com;stale");
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Params(Vec<Param>);

impl Params {
    /// Creates an empty `Params` list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the parameter list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the value of a parameter by name.
    ///
    /// The outer `Option` tells whether the parameter exists,
    /// the inner one whether it has a value.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.position(name).map(|idx| self.0[idx].value.as_deref())
    }

    /// Returns `true` if there is a parameter called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    /// Pushes a parameter at the end of the list, even if
    /// another one has the same name.
    pub fn push(&mut self, param: Param) {
        self.0.push(param)
    }

    /// Sets the value of the parameter `name`.
    ///
    /// An existing parameter keeps its position, otherwise the
    /// parameter is appended.
    pub fn set(&mut self, name: impl Into<String>, value: Option<impl Into<String>>) {
        let param = Param::new(name, value);

        match self.position(&param.name) {
            Some(idx) => self.0[idx].value = param.value,
            None => self.0.push(param),
        }
    }

    /// Removes the parameter `name`, returning it.
    pub fn remove(&mut self, name: &str) -> Option<Param> {
        self.position(name).map(|idx| self.0.remove(idx))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in &self.0 {
            write!(f, ";{param}")?;
        }
        Ok(())
    }
}

impl<N, V, const L: usize> From<[(N, V); L]> for Params
where
    N: Into<String>,
    V: Into<String>,
{
    fn from(params: [(N, V); L]) -> Self {
        Self(
            params
                .into_iter()
                .map(|(name, value)| Param::new(name, Some(value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position() {
        let mut params = Params::from([("realm", "a"), ("nonce", "b")]);
        params.set("Realm", Some("c"));

        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["realm", "nonce"]);
        assert_eq!(params.get("realm"), Some(Some("c")));
    }

    #[test]
    fn test_remove() {
        let mut params = Params::from([("lr", ""), ("transport", "tcp")]);

        assert_eq!(params.remove("transport"), Some(Param::new("transport", Some("tcp"))));
        assert!(!params.contains("transport"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.remove("maddr"), None);
    }
}
