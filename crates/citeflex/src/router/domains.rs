//! Static domain tables for URL classification.
//!
//! Keys are registrable domains without `www.`; subdomains match their parent
//! (`edition.cnn.com` finds `cnn.com`). Values are the names printed in
//! citations.

use std::collections::HashMap;

/// Newspapers, magazines and wire services.
pub const NEWSPAPERS: &[(&str, &str)] = &[
    // United States
    ("nytimes.com", "New York Times"),
    ("washingtonpost.com", "Washington Post"),
    ("wsj.com", "Wall Street Journal"),
    ("usatoday.com", "USA Today"),
    ("latimes.com", "Los Angeles Times"),
    ("chicagotribune.com", "Chicago Tribune"),
    ("bostonglobe.com", "Boston Globe"),
    ("sfchronicle.com", "San Francisco Chronicle"),
    ("nypost.com", "New York Post"),
    ("nydailynews.com", "New York Daily News"),
    ("newsday.com", "Newsday"),
    ("philly.com", "Philadelphia Inquirer"),
    ("inquirer.com", "Philadelphia Inquirer"),
    ("dallasnews.com", "Dallas Morning News"),
    ("houstonchronicle.com", "Houston Chronicle"),
    ("miamiherald.com", "Miami Herald"),
    ("seattletimes.com", "Seattle Times"),
    ("denverpost.com", "Denver Post"),
    ("startribune.com", "Star Tribune"),
    ("ajc.com", "Atlanta Journal-Constitution"),
    ("tampabay.com", "Tampa Bay Times"),
    ("baltimoresun.com", "Baltimore Sun"),
    ("sacbee.com", "Sacramento Bee"),
    ("azcentral.com", "Arizona Republic"),
    ("oregonlive.com", "The Oregonian"),
    ("jsonline.com", "Milwaukee Journal Sentinel"),
    ("post-gazette.com", "Pittsburgh Post-Gazette"),
    ("stltoday.com", "St. Louis Post-Dispatch"),
    ("freep.com", "Detroit Free Press"),
    ("detroitnews.com", "Detroit News"),
    ("cleveland.com", "Plain Dealer"),
    ("nola.com", "Times-Picayune"),
    ("orlandosentinel.com", "Orlando Sentinel"),
    ("sun-sentinel.com", "South Florida Sun Sentinel"),
    ("kansascity.com", "Kansas City Star"),
    ("charlotteobserver.com", "Charlotte Observer"),
    ("newsobserver.com", "News & Observer"),
    ("courier-journal.com", "Courier-Journal"),
    ("tennessean.com", "The Tennessean"),
    ("texastribune.org", "Texas Tribune"),
    ("theatlantic.com", "The Atlantic"),
    ("newyorker.com", "The New Yorker"),
    ("time.com", "Time"),
    ("newsweek.com", "Newsweek"),
    ("politico.com", "Politico"),
    ("axios.com", "Axios"),
    ("vox.com", "Vox"),
    ("slate.com", "Slate"),
    ("salon.com", "Salon"),
    ("thehill.com", "The Hill"),
    ("rollcall.com", "Roll Call"),
    ("motherjones.com", "Mother Jones"),
    ("thenation.com", "The Nation"),
    ("newrepublic.com", "New Republic"),
    ("nationalreview.com", "National Review"),
    ("reason.com", "Reason"),
    ("theintercept.com", "The Intercept"),
    ("propublica.org", "ProPublica"),
    ("huffpost.com", "HuffPost"),
    ("huffingtonpost.com", "HuffPost"),
    ("buzzfeednews.com", "BuzzFeed News"),
    ("businessinsider.com", "Business Insider"),
    ("forbes.com", "Forbes"),
    ("fortune.com", "Fortune"),
    ("bloomberg.com", "Bloomberg"),
    ("cnbc.com", "CNBC"),
    ("marketwatch.com", "MarketWatch"),
    ("barrons.com", "Barron's"),
    ("fastcompany.com", "Fast Company"),
    ("wired.com", "Wired"),
    ("theverge.com", "The Verge"),
    ("arstechnica.com", "Ars Technica"),
    ("techcrunch.com", "TechCrunch"),
    ("rollingstone.com", "Rolling Stone"),
    ("vanityfair.com", "Vanity Fair"),
    ("harpers.org", "Harper's Magazine"),
    ("nybooks.com", "New York Review of Books"),
    ("nymag.com", "New York Magazine"),
    ("foreignpolicy.com", "Foreign Policy"),
    ("foreignaffairs.com", "Foreign Affairs"),
    ("theconversation.com", "The Conversation"),
    ("scientificamerican.com", "Scientific American"),
    ("smithsonianmag.com", "Smithsonian Magazine"),
    ("nationalgeographic.com", "National Geographic"),
    ("cnn.com", "CNN"),
    ("foxnews.com", "Fox News"),
    ("nbcnews.com", "NBC News"),
    ("cbsnews.com", "CBS News"),
    ("abcnews.go.com", "ABC News"),
    ("msnbc.com", "MSNBC"),
    ("npr.org", "NPR"),
    ("pbs.org", "PBS"),
    ("csmonitor.com", "Christian Science Monitor"),
    ("law360.com", "Law360"),
    ("statnews.com", "STAT"),
    ("insidehighered.com", "Inside Higher Ed"),
    ("chronicle.com", "Chronicle of Higher Education"),
    ("edweek.org", "Education Week"),
    ("variety.com", "Variety"),
    ("hollywoodreporter.com", "Hollywood Reporter"),
    // Wire services
    ("reuters.com", "Reuters"),
    ("apnews.com", "Associated Press"),
    ("afp.com", "Agence France-Presse"),
    ("upi.com", "UPI"),
    // United Kingdom
    ("theguardian.com", "The Guardian"),
    ("guardian.co.uk", "The Guardian"),
    ("bbc.co.uk", "BBC"),
    ("bbc.com", "BBC"),
    ("thetimes.co.uk", "The Times"),
    ("thetimes.com", "The Times"),
    ("telegraph.co.uk", "The Telegraph"),
    ("ft.com", "Financial Times"),
    ("economist.com", "The Economist"),
    ("independent.co.uk", "The Independent"),
    ("dailymail.co.uk", "Daily Mail"),
    ("mirror.co.uk", "Daily Mirror"),
    ("thesun.co.uk", "The Sun"),
    ("express.co.uk", "Daily Express"),
    ("standard.co.uk", "Evening Standard"),
    ("inews.co.uk", "i"),
    ("spectator.co.uk", "The Spectator"),
    ("newstatesman.com", "New Statesman"),
    ("prospectmagazine.co.uk", "Prospect"),
    ("lrb.co.uk", "London Review of Books"),
    ("scotsman.com", "The Scotsman"),
    ("heraldscotland.com", "The Herald"),
    ("walesonline.co.uk", "WalesOnline"),
    ("belfasttelegraph.co.uk", "Belfast Telegraph"),
    ("manchestereveningnews.co.uk", "Manchester Evening News"),
    ("yorkshirepost.co.uk", "Yorkshire Post"),
    ("news.sky.com", "Sky News"),
    ("channel4.com", "Channel 4 News"),
    ("itv.com", "ITV News"),
    // Ireland
    ("irishtimes.com", "Irish Times"),
    ("independent.ie", "Irish Independent"),
    ("irishexaminer.com", "Irish Examiner"),
    ("rte.ie", "RTÉ"),
    // Canada
    ("theglobeandmail.com", "Globe and Mail"),
    ("thestar.com", "Toronto Star"),
    ("nationalpost.com", "National Post"),
    ("cbc.ca", "CBC News"),
    ("ctvnews.ca", "CTV News"),
    ("globalnews.ca", "Global News"),
    ("montrealgazette.com", "Montreal Gazette"),
    ("vancouversun.com", "Vancouver Sun"),
    ("ottawacitizen.com", "Ottawa Citizen"),
    ("macleans.ca", "Maclean's"),
    ("ledevoir.com", "Le Devoir"),
    ("lapresse.ca", "La Presse"),
    // Australia and New Zealand
    ("smh.com.au", "Sydney Morning Herald"),
    ("theage.com.au", "The Age"),
    ("theaustralian.com.au", "The Australian"),
    ("abc.net.au", "ABC News"),
    ("news.com.au", "News.com.au"),
    ("afr.com", "Australian Financial Review"),
    ("heraldsun.com.au", "Herald Sun"),
    ("dailytelegraph.com.au", "Daily Telegraph"),
    ("brisbanetimes.com.au", "Brisbane Times"),
    ("watoday.com.au", "WAtoday"),
    ("crikey.com.au", "Crikey"),
    ("nzherald.co.nz", "New Zealand Herald"),
    ("stuff.co.nz", "Stuff"),
    ("rnz.co.nz", "RNZ"),
    // India
    ("thehindu.com", "The Hindu"),
    ("timesofindia.indiatimes.com", "Times of India"),
    ("indiatimes.com", "Times of India"),
    ("hindustantimes.com", "Hindustan Times"),
    ("indianexpress.com", "Indian Express"),
    ("ndtv.com", "NDTV"),
    ("livemint.com", "Mint"),
    ("business-standard.com", "Business Standard"),
    ("thewire.in", "The Wire"),
    ("scroll.in", "Scroll.in"),
    // South Africa
    ("mg.co.za", "Mail & Guardian"),
    ("news24.com", "News24"),
    ("dailymaverick.co.za", "Daily Maverick"),
    ("timeslive.co.za", "TimesLIVE"),
    // Asia and Middle East
    ("scmp.com", "South China Morning Post"),
    ("straitstimes.com", "Straits Times"),
    ("japantimes.co.jp", "Japan Times"),
    ("asahi.com", "Asahi Shimbun"),
    ("koreaherald.com", "Korea Herald"),
    ("koreatimes.co.kr", "Korea Times"),
    ("aljazeera.com", "Al Jazeera"),
    ("haaretz.com", "Haaretz"),
    ("timesofisrael.com", "Times of Israel"),
    ("jpost.com", "Jerusalem Post"),
    ("thenationalnews.com", "The National"),
    ("dawn.com", "Dawn"),
    // Continental Europe
    ("lemonde.fr", "Le Monde"),
    ("lefigaro.fr", "Le Figaro"),
    ("liberation.fr", "Libération"),
    ("lesechos.fr", "Les Echos"),
    ("france24.com", "France 24"),
    ("spiegel.de", "Der Spiegel"),
    ("zeit.de", "Die Zeit"),
    ("faz.net", "Frankfurter Allgemeine Zeitung"),
    ("sueddeutsche.de", "Süddeutsche Zeitung"),
    ("welt.de", "Die Welt"),
    ("handelsblatt.com", "Handelsblatt"),
    ("dw.com", "Deutsche Welle"),
    ("elpais.com", "El País"),
    ("elmundo.es", "El Mundo"),
    ("abc.es", "ABC"),
    ("lavanguardia.com", "La Vanguardia"),
    ("corriere.it", "Corriere della Sera"),
    ("repubblica.it", "La Repubblica"),
    ("lastampa.it", "La Stampa"),
    ("ilsole24ore.com", "Il Sole 24 Ore"),
    ("nrc.nl", "NRC"),
    ("volkskrant.nl", "de Volkskrant"),
    ("nzz.ch", "Neue Zürcher Zeitung"),
    ("derstandard.at", "Der Standard"),
    ("politico.eu", "Politico Europe"),
    ("euronews.com", "Euronews"),
    ("swissinfo.ch", "Swissinfo"),
    ("thelocal.se", "The Local"),
    ("kyivindependent.com", "Kyiv Independent"),
    ("themoscowtimes.com", "Moscow Times"),
    // Latin America
    ("clarin.com", "Clarín"),
    ("lanacion.com.ar", "La Nación"),
    ("folha.uol.com.br", "Folha de S.Paulo"),
    ("oglobo.globo.com", "O Globo"),
    ("eluniversal.com.mx", "El Universal"),
    ("milenio.com", "Milenio"),
];

/// Government agencies and international organisations.
pub const GOVERNMENT: &[(&str, &str)] = &[
    // United States federal
    ("whitehouse.gov", "The White House"),
    ("congress.gov", "U.S. Congress"),
    ("senate.gov", "U.S. Senate"),
    ("house.gov", "U.S. House of Representatives"),
    ("gao.gov", "U.S. Government Accountability Office"),
    ("cbo.gov", "Congressional Budget Office"),
    ("crsreports.congress.gov", "Congressional Research Service"),
    ("govinfo.gov", "U.S. Government Publishing Office"),
    ("federalregister.gov", "Federal Register"),
    ("regulations.gov", "Regulations.gov"),
    ("cdc.gov", "Centers for Disease Control and Prevention"),
    ("nih.gov", "National Institutes of Health"),
    ("fda.gov", "U.S. Food and Drug Administration"),
    ("hhs.gov", "U.S. Department of Health and Human Services"),
    ("cms.gov", "Centers for Medicare & Medicaid Services"),
    ("epa.gov", "U.S. Environmental Protection Agency"),
    ("energy.gov", "U.S. Department of Energy"),
    ("eia.gov", "U.S. Energy Information Administration"),
    ("ed.gov", "U.S. Department of Education"),
    ("state.gov", "U.S. Department of State"),
    ("defense.gov", "U.S. Department of Defense"),
    ("justice.gov", "U.S. Department of Justice"),
    ("fbi.gov", "Federal Bureau of Investigation"),
    ("dhs.gov", "U.S. Department of Homeland Security"),
    ("treasury.gov", "U.S. Department of the Treasury"),
    ("irs.gov", "Internal Revenue Service"),
    ("usda.gov", "U.S. Department of Agriculture"),
    ("commerce.gov", "U.S. Department of Commerce"),
    ("census.gov", "U.S. Census Bureau"),
    ("bls.gov", "U.S. Bureau of Labor Statistics"),
    ("bea.gov", "U.S. Bureau of Economic Analysis"),
    ("dol.gov", "U.S. Department of Labor"),
    ("hud.gov", "U.S. Department of Housing and Urban Development"),
    ("transportation.gov", "U.S. Department of Transportation"),
    ("va.gov", "U.S. Department of Veterans Affairs"),
    ("interior.gov", "U.S. Department of the Interior"),
    ("noaa.gov", "National Oceanic and Atmospheric Administration"),
    ("nasa.gov", "NASA"),
    ("nsf.gov", "National Science Foundation"),
    ("nist.gov", "National Institute of Standards and Technology"),
    ("usgs.gov", "U.S. Geological Survey"),
    ("sec.gov", "U.S. Securities and Exchange Commission"),
    ("ftc.gov", "Federal Trade Commission"),
    ("fcc.gov", "Federal Communications Commission"),
    ("federalreserve.gov", "Board of Governors of the Federal Reserve System"),
    ("uspto.gov", "U.S. Patent and Trademark Office"),
    ("ssa.gov", "Social Security Administration"),
    ("archives.gov", "National Archives"),
    ("loc.gov", "Library of Congress"),
    ("usa.gov", "USA.gov"),
    // United Kingdom
    ("gov.uk", "UK Government"),
    ("parliament.uk", "UK Parliament"),
    ("legislation.gov.uk", "UK Legislation"),
    ("ons.gov.uk", "Office for National Statistics"),
    ("nhs.uk", "NHS"),
    ("nice.org.uk", "National Institute for Health and Care Excellence"),
    ("bankofengland.co.uk", "Bank of England"),
    ("gov.scot", "Scottish Government"),
    ("gov.wales", "Welsh Government"),
    ("nidirect.gov.uk", "NI Direct"),
    // Canada
    ("canada.ca", "Government of Canada"),
    ("gc.ca", "Government of Canada"),
    ("statcan.gc.ca", "Statistics Canada"),
    ("ourcommons.ca", "House of Commons of Canada"),
    ("bankofcanada.ca", "Bank of Canada"),
    ("ontario.ca", "Government of Ontario"),
    ("gov.bc.ca", "Government of British Columbia"),
    ("quebec.ca", "Gouvernement du Québec"),
    // Australia and New Zealand
    ("australia.gov.au", "Australian Government"),
    ("aph.gov.au", "Parliament of Australia"),
    ("abs.gov.au", "Australian Bureau of Statistics"),
    ("health.gov.au", "Australian Department of Health"),
    ("rba.gov.au", "Reserve Bank of Australia"),
    ("govt.nz", "New Zealand Government"),
    ("parliament.nz", "New Zealand Parliament"),
    ("stats.govt.nz", "Stats NZ"),
    // India
    ("india.gov.in", "Government of India"),
    ("pib.gov.in", "Press Information Bureau"),
    ("rbi.org.in", "Reserve Bank of India"),
    // Europe
    ("europa.eu", "European Union"),
    ("ec.europa.eu", "European Commission"),
    ("europarl.europa.eu", "European Parliament"),
    ("consilium.europa.eu", "Council of the European Union"),
    ("ecb.europa.eu", "European Central Bank"),
    ("eur-lex.europa.eu", "EUR-Lex"),
    ("gouv.fr", "Gouvernement français"),
    ("bundesregierung.de", "Bundesregierung"),
    ("bund.de", "Bundesregierung"),
    ("government.nl", "Government of the Netherlands"),
    ("gov.ie", "Government of Ireland"),
    ("oireachtas.ie", "Houses of the Oireachtas"),
    // International organisations
    ("un.org", "United Nations"),
    ("who.int", "World Health Organization"),
    ("worldbank.org", "World Bank"),
    ("imf.org", "International Monetary Fund"),
    ("oecd.org", "OECD"),
    ("wto.org", "World Trade Organization"),
    ("ilo.org", "International Labour Organization"),
    ("unesco.org", "UNESCO"),
    ("unicef.org", "UNICEF"),
    ("unhcr.org", "UNHCR"),
    ("undp.org", "United Nations Development Programme"),
    ("nato.int", "NATO"),
    ("coe.int", "Council of Europe"),
    ("ipcc.ch", "Intergovernmental Panel on Climate Change"),
];

/// Host suffixes that mark government sites when no exact entry matched.
pub const GOVERNMENT_SUFFIXES: &[&str] = &[
    ".gov",
    ".mil",
    ".fed.us",
    ".gov.uk",
    ".nhs.uk",
    ".police.uk",
    ".gc.ca",
    ".gov.au",
    ".govt.nz",
    ".gov.in",
    ".nic.in",
    ".gov.ie",
    ".gov.sg",
    ".gov.za",
    ".gov.hk",
    ".europa.eu",
    ".gouv.fr",
    ".gouv.qc.ca",
    ".bund.de",
    ".admin.ch",
    ".gv.at",
    ".overheid.nl",
    ".gob.es",
    ".gob.mx",
    ".gov.br",
    ".go.jp",
    ".go.kr",
    ".un.org",
    ".int",
];

/// Courts and case-law databases.
pub const LEGAL: &[(&str, &str)] = &[
    // United States
    ("supremecourt.gov", "Supreme Court of the United States"),
    ("uscourts.gov", "United States Courts"),
    ("ca1.uscourts.gov", "U.S. Court of Appeals for the First Circuit"),
    ("ca2.uscourts.gov", "U.S. Court of Appeals for the Second Circuit"),
    ("ca9.uscourts.gov", "U.S. Court of Appeals for the Ninth Circuit"),
    ("cadc.uscourts.gov", "U.S. Court of Appeals for the D.C. Circuit"),
    ("courtlistener.com", "CourtListener"),
    ("law.cornell.edu", "Legal Information Institute"),
    ("justia.com", "Justia"),
    ("supreme.justia.com", "Justia U.S. Supreme Court"),
    ("oyez.org", "Oyez"),
    ("casetext.com", "Casetext"),
    ("findlaw.com", "FindLaw"),
    ("caselaw.findlaw.com", "FindLaw Caselaw"),
    ("leagle.com", "Leagle"),
    ("casemine.com", "CaseMine"),
    ("scotusblog.com", "SCOTUSblog"),
    ("law.justia.com", "Justia"),
    ("case.law", "Caselaw Access Project"),
    ("nycourts.gov", "New York State Unified Court System"),
    ("courts.ca.gov", "Judicial Branch of California"),
    // United Kingdom and Ireland
    ("bailii.org", "BAILII"),
    ("supremecourt.uk", "UK Supreme Court"),
    ("judiciary.uk", "Courts and Tribunals Judiciary"),
    ("caselaw.nationalarchives.gov.uk", "Find Case Law"),
    ("scotcourts.gov.uk", "Scottish Courts and Tribunals"),
    ("judiciaryni.uk", "Judiciary NI"),
    ("courts.ie", "Courts Service of Ireland"),
    // Canada
    ("canlii.org", "CanLII"),
    ("scc-csc.ca", "Supreme Court of Canada"),
    ("scc-csc.lexum.com", "Supreme Court of Canada"),
    // Australia and New Zealand
    ("austlii.edu.au", "AustLII"),
    ("hcourt.gov.au", "High Court of Australia"),
    ("fedcourt.gov.au", "Federal Court of Australia"),
    ("nzlii.org", "NZLII"),
    ("courtsofnz.govt.nz", "Courts of New Zealand"),
    // Europe and international
    ("curia.europa.eu", "Court of Justice of the European Union"),
    ("hudoc.echr.coe.int", "European Court of Human Rights"),
    ("echr.coe.int", "European Court of Human Rights"),
    ("icj-cij.org", "International Court of Justice"),
    ("icc-cpi.int", "International Criminal Court"),
    ("worldlii.org", "WorldLII"),
    ("commonlii.org", "CommonLII"),
    // India
    ("indiankanoon.org", "Indian Kanoon"),
    ("main.sci.gov.in", "Supreme Court of India"),
    ("sci.gov.in", "Supreme Court of India"),
];

/// Academic publishers whose article pages carry `citation_*` meta tags.
pub const ACADEMIC_PUBLISHERS: &[(&str, &str)] = &[
    ("sciencedirect.com", "Elsevier"),
    ("cell.com", "Cell Press"),
    ("thelancet.com", "The Lancet"),
    ("springer.com", "Springer"),
    ("link.springer.com", "Springer"),
    ("nature.com", "Nature Portfolio"),
    ("biomedcentral.com", "BioMed Central"),
    ("wiley.com", "Wiley"),
    ("onlinelibrary.wiley.com", "Wiley"),
    ("tandfonline.com", "Taylor & Francis"),
    ("sagepub.com", "SAGE"),
    ("journals.sagepub.com", "SAGE"),
    ("academic.oup.com", "Oxford University Press"),
    ("cambridge.org", "Cambridge University Press"),
    ("science.org", "Science"),
    ("pnas.org", "PNAS"),
    ("plos.org", "PLOS"),
    ("journals.plos.org", "PLOS"),
    ("frontiersin.org", "Frontiers"),
    ("mdpi.com", "MDPI"),
    ("ieeexplore.ieee.org", "IEEE"),
    ("dl.acm.org", "ACM"),
    ("jamanetwork.com", "JAMA Network"),
    ("nejm.org", "New England Journal of Medicine"),
    ("bmj.com", "BMJ"),
    ("annualreviews.org", "Annual Reviews"),
    ("muse.jhu.edu", "Project MUSE"),
    ("degruyter.com", "De Gruyter"),
    ("brill.com", "Brill"),
    ("emerald.com", "Emerald"),
    ("journals.uchicago.edu", "University of Chicago Press"),
    ("journals.aps.org", "American Physical Society"),
    ("pubs.acs.org", "ACS Publications"),
    ("pubs.rsc.org", "Royal Society of Chemistry"),
    ("iopscience.iop.org", "IOP Publishing"),
    ("royalsocietypublishing.org", "Royal Society"),
    ("aeaweb.org", "American Economic Association"),
    ("psycnet.apa.org", "APA PsycNet"),
    ("elifesciences.org", "eLife"),
    ("peerj.com", "PeerJ"),
    ("biorxiv.org", "bioRxiv"),
    ("medrxiv.org", "medRxiv"),
    ("hindawi.com", "Hindawi"),
    ("karger.com", "Karger"),
    ("thieme-connect.com", "Thieme"),
    ("aip.scitation.org", "AIP Publishing"),
    ("pubs.aip.org", "AIP Publishing"),
    ("journals.lww.com", "Wolters Kluwer"),
    ("ahajournals.org", "American Heart Association"),
    ("jstor.org", "JSTOR"),
    ("ssrn.com", "SSRN"),
    ("researchgate.net", "ResearchGate"),
];

/// Lookup maps built from the tables above.
#[derive(Debug, Clone)]
pub struct DomainTables {
    pub newspapers: HashMap<&'static str, &'static str>,
    pub government: HashMap<&'static str, &'static str>,
    pub government_suffixes: Vec<&'static str>,
    pub legal: HashMap<&'static str, &'static str>,
    pub academic: HashMap<&'static str, &'static str>,
}

impl DomainTables {
    /// Build the built-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            newspapers: NEWSPAPERS.iter().copied().collect(),
            government: GOVERNMENT.iter().copied().collect(),
            government_suffixes: GOVERNMENT_SUFFIXES.to_vec(),
            legal: LEGAL.iter().copied().collect(),
            academic: ACADEMIC_PUBLISHERS.iter().copied().collect(),
        }
    }

    /// Total number of exact-domain entries across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.newspapers.len() + self.government.len() + self.legal.len() + self.academic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Newspaper name for a host.
    #[must_use]
    pub fn newspaper(&self, host: &str) -> Option<&'static str> {
        lookup(&self.newspapers, host)
    }

    /// Legal source name for a host.
    #[must_use]
    pub fn legal(&self, host: &str) -> Option<&'static str> {
        lookup(&self.legal, host)
    }

    /// Academic publisher name for a host.
    #[must_use]
    pub fn academic(&self, host: &str) -> Option<&'static str> {
        lookup(&self.academic, host)
    }

    /// Government match: `Some(Some(name))` for a known agency,
    /// `Some(None)` for a government suffix, `None` otherwise.
    #[must_use]
    pub fn government(&self, host: &str) -> Option<Option<&'static str>> {
        if let Some(name) = lookup(&self.government, host) {
            return Some(Some(name));
        }
        self.government_suffixes
            .iter()
            .any(|suffix| host.ends_with(suffix))
            .then_some(None)
    }
}

/// [`LEGAL`] hosts run by the court that decides the cases they publish.
/// Case-law databases and court administration sites are not listed.
pub const COURT_HOSTS: &[&str] = &[
    "supremecourt.gov",
    "ca1.uscourts.gov",
    "ca2.uscourts.gov",
    "ca9.uscourts.gov",
    "cadc.uscourts.gov",
    "supremecourt.uk",
    "scc-csc.ca",
    "scc-csc.lexum.com",
    "hcourt.gov.au",
    "fedcourt.gov.au",
];

/// Name of the court whose own site `host` is.
#[must_use]
pub fn court(host: &str) -> Option<&'static str> {
    let mut candidate = host;
    loop {
        if COURT_HOSTS.contains(&candidate) {
            return LEGAL.iter().find(|(domain, _)| *domain == candidate).map(|(_, name)| *name);
        }
        match candidate.split_once('.') {
            Some((_, rest)) if rest.contains('.') => candidate = rest,
            _ => return None,
        }
    }
}

/// Most specific table entry for a host: the host itself, then each parent
/// domain with at least two labels.
#[must_use]
pub fn lookup(map: &HashMap<&'static str, &'static str>, host: &str) -> Option<&'static str> {
    let mut candidate = host;
    loop {
        if let Some(name) = map.get(candidate) {
            return Some(*name);
        }
        match candidate.split_once('.') {
            Some((_, rest)) if rest.contains('.') => candidate = rest,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_lookup() {
        let tables = DomainTables::builtin();
        assert_eq!(tables.newspaper("edition.cnn.com"), Some("CNN"));
        assert_eq!(tables.newspaper("notcnn.com"), None);
        assert_eq!(tables.newspaper("cnn.com.evil.io"), None);
    }

    #[test]
    fn test_most_specific_entry_wins() {
        let tables = DomainTables::builtin();
        assert_eq!(tables.government("ec.europa.eu"), Some(Some("European Commission")));
        assert_eq!(tables.government("eurostat.ec.europa.eu"), Some(Some("European Commission")));
        assert_eq!(tables.legal("supreme.justia.com"), Some("Justia U.S. Supreme Court"));
    }

    #[test]
    fn test_government_suffix_without_entry() {
        let tables = DomainTables::builtin();
        assert_eq!(tables.government("dmv.ca.gov"), Some(None));
        assert_eq!(tables.government("example.com"), None);
    }

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        for table in [NEWSPAPERS, GOVERNMENT, LEGAL, ACADEMIC_PUBLISHERS] {
            let mut seen = std::collections::HashSet::new();
            for (domain, _) in table {
                assert!(seen.insert(*domain), "duplicate entry {domain}");
            }
        }
    }

    #[test]
    fn test_court_hosts() {
        for host in COURT_HOSTS {
            assert!(court(host).is_some(), "{host} missing from LEGAL");
        }
        assert_eq!(court("ca9.uscourts.gov"), Some("U.S. Court of Appeals for the Ninth Circuit"));
        assert_eq!(court("www.supremecourt.gov"), Some("Supreme Court of the United States"));
        assert_eq!(court("supreme.justia.com"), None);
        assert_eq!(court("uscourts.gov"), None);
        assert_eq!(court("judiciary.uk"), None);
    }

    #[test]
    fn test_table_sizes() {
        let tables = DomainTables::builtin();
        assert!(tables.newspapers.len() > 200);
        assert!(tables.len() > 400);
    }
}
